// SPDX-License-Identifier: CC0-1.0

//! Consensus parameters.

pub mod params;

pub use self::params::{current, set_current, Params};
