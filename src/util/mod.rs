// SPDX-License-Identifier: CC0-1.0

//! Low-level numeric building blocks shared by the consensus core.

pub mod uint;
