// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! # multialgo-pow-core
//!
//! Consensus difficulty-retargeting and proof-of-work validation core for a
//! multi-algorithm, merge-mined cryptocurrency: five concurrent mining
//! algorithms (SHA256D, Scrypt, Groestl, Skein, and a fifth rotating
//! Qubit/Yescrypt slot), each retargeted independently, combined into a
//! single chain through algorithm-weighted/normalized/geometric-mean work
//! accounting.
//!
//! This crate does not validate transactions, store blocks, speak the P2P
//! protocol, or build mining templates — it only computes the next required
//! target, a block's contribution to chain work, and whether a header's
//! declared proof of work (direct or merge-mined) is valid. Callers supply
//! their own block-index type through the [`chain::BlockIndexView`] /
//! [`chain::BlockIndexStore`] traits.
//!
//! ## Layout
//!
//! - [`util::uint`] — fixed 256-bit arithmetic and the compact-bits codec.
//! - [`blockdata::block`] — the 80-byte header shape and its algorithm/AuxPoW
//!   version bitfields.
//! - [`blockdata::constants`] — genesis parameters, checkpoints, block
//!   subsidy.
//! - [`network`] — network identity (`main`/`test`/`regtest`) and the
//!   constants it selects (magic bytes, ports, address prefixes).
//! - [`chain`] — the read-only chain-index view and per-algorithm selector.
//! - [`consensus::params`] — the per-network constant table and the
//!   process-wide initialize-once handle.
//! - [`pow`] — hash dispatch, the retarget engine, work accounting and the
//!   PoW verifier (including AuxPoW dispatch).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(not(feature = "std"))]
compile_error!("multialgo-pow-core currently requires the `std` feature; see DESIGN.md");

#[cfg(feature = "serde")]
extern crate actual_serde as serde;

pub mod blockdata;
pub mod chain;
pub mod consensus;
pub mod network;
pub mod pow;
pub mod util;

pub use crate::blockdata::block::{Algorithm, BlockHeader, NUM_ALGOS};
pub use crate::consensus::params::Params;
pub use crate::network::constants::Network;
pub use crate::util::uint::Uint256;
