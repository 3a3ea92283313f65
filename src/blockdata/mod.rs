// SPDX-License-Identifier: CC0-1.0

//! Block header data model (C2's input shape and C3's node contents).

pub mod block;
pub mod constants;

pub use self::block::{Algorithm, BlockHeader, NUM_ALGOS};
