// SPDX-License-Identifier: CC0-1.0

//! Network identity (mainnet / testnet / regtest).

pub mod constants;

pub use self::constants::Network;
