// SPDX-License-Identifier: CC0-1.0

//! Genesis parameters, checkpoints and block subsidy.
//!
//! Genesis-block *construction* (assembling the coinbase transaction and its
//! Merkle root) is explicitly out of scope for this core; what the core
//! consumes is the fixed header fields plus the already-known Merkle root,
//! which is enough to reproduce the tabulated genesis hash through the
//! ordinary SHA256D header-identity hash.

use crate::blockdata::block::BlockHeader;
use crate::network::constants::Network;

/// The fixed fields of a network's genesis header, plus the values the
/// original chain's genesis coinbase paid out and the hashes that must
/// result.
#[derive(Copy, Clone, Debug)]
pub struct GenesisParams {
    /// Genesis header timestamp.
    pub time: u32,
    /// Genesis header nonce.
    pub nonce: u32,
    /// Genesis header compact target.
    pub bits: u32,
    /// Genesis header version.
    pub version: i32,
    /// Coinbase reward, in the smallest unit.
    pub reward: u64,
    /// Precomputed Merkle root of the single coinbase transaction (building
    /// it is out of scope; the value is a constant of the chain). `None`
    /// when the upstream chain parameters only tabulate the resulting hash
    /// and not the Merkle root that produced it (testnet and regtest here),
    /// since reconstructing one from the hash is not possible and
    /// fabricating a root would not reproduce the tabulated hash.
    pub merkle_root: Option<[u8; 32]>,
    /// Expected genesis block hash.
    pub hash: [u8; 32],
}

/// Smallest subsidy unit: 10^8 smallest units per coin.
pub const COIN: u64 = 100_000_000;

fn hex32(s: &str) -> [u8; 32] {
    assert_eq!(s.len(), 64);
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).expect("valid hex");
    }
    out
}

/// Returns the genesis parameters for `network`.
pub fn genesis_params(network: Network) -> GenesisParams {
    match network {
        Network::Main => GenesisParams {
            time: 1_393_164_995,
            nonce: 2_092_903_596,
            bits: 0x1e0f_ffff,
            version: 2,
            reward: 1000 * COIN,
            merkle_root: Some(hex32(
                "3f75db3c18e92f46c21530dc1222e1fddf4ccebbf88e289a6c9dc787fd6469da",
            )),
            hash: hex32("00000ffde4c020b5938441a0ea3d314bf619eff0b38f32f78f7583cffa1ea485"),
        },
        Network::Test => GenesisParams {
            time: 1_392_876_393,
            nonce: 416_875_379,
            bits: 0x1e0f_ffff,
            version: 2,
            reward: 1000 * COIN,
            merkle_root: None,
            hash: hex32("0000017ce2a79c8bddafbbe47c004aa92b20678c354b34085f62b762084b9788"),
        },
        Network::Regtest => GenesisParams {
            time: 1_296_688_602,
            nonce: 4,
            bits: 0x207f_ffff,
            version: 2,
            reward: 1000 * COIN,
            merkle_root: None,
            hash: hex32("63b92987ddc93808aa33dddc80b3e52948bdfffaf2420bf4cd9c5137b54ea37c"),
        },
    }
}

/// Builds the genesis header for `network` from [`genesis_params`].
///
/// The header's own identity hash (always SHA256D, regardless of the
/// algorithm field — see [`crate::blockdata::block::BlockHeader`]'s module
/// doc) must equal the tabulated genesis hash.
///
/// Returns `None` when the network's Merkle root isn't tabulated (see
/// [`GenesisParams::merkle_root`]), since a header can't be built without it.
pub fn genesis_header(network: Network) -> Option<BlockHeader> {
    let p = genesis_params(network);
    Some(BlockHeader {
        version: p.version,
        prev_blockhash: [0u8; 32],
        merkle_root: p.merkle_root?,
        time: p.time,
        bits: p.bits,
        nonce: p.nonce,
    })
}

/// A height/hash checkpoint pair.
#[derive(Copy, Clone, Debug)]
pub struct Checkpoint {
    /// Block height the checkpoint pins.
    pub height: u64,
    /// Expected hash at that height.
    pub hash: [u8; 32],
}

/// Returns the embedded checkpoint list for `network`.
///
/// Consumed by the acceptance layer as an external gate; the core only
/// exposes the values by value and performs the plain lookup helper below.
pub fn checkpoints(network: Network) -> &'static [Checkpoint] {
    match network {
        Network::Main => &MAIN_CHECKPOINTS,
        Network::Test => &[],
        Network::Regtest => &[],
    }
}

static MAIN_CHECKPOINTS: [Checkpoint; 3] = [
    Checkpoint {
        height: 0,
        hash: *b"\x00\x00\x0f\xfd\xe4\xc0\x20\xb5\x93\x84\x41\xa0\xea\x3d\x31\x4b\xf6\x19\xef\xf0\xb3\x8f\x32\xf7\x8f\x75\x83\xcf\xfa\x1e\xa4\x85",
    },
    Checkpoint {
        height: 740_001,
        hash: *b"\x00\x00\x00\x00\x00\x00\x02\xc7\xaa\xa3\xad\x68\x8e\xb5\xaf\x7d\x27\x79\xf4\xaa\x1d\x9a\x1b\x9a\x5c\x3c\xfb\x4c\xca\xd5\x6c\xaa",
    },
    Checkpoint {
        height: 1_402_167,
        hash: *b"\x82\x15\xcd\x9f\xeb\x2d\xb9\xbf\x74\x51\x43\x61\xa9\xd4\xb4\x44\x0f\x05\x41\x01\x07\x9d\xf8\xbb\x6b\xf6\x29\x06\x5d\xb3\xab\x29",
    },
];

/// Looks up whether `hash` is the expected hash at `height`, or `true` if
/// `height` carries no checkpoint.
pub fn check_block(checkpoints: &[Checkpoint], height: u64, hash: &[u8; 32]) -> bool {
    match checkpoints.iter().find(|c| c.height == height) {
        Some(c) => &c.hash == hash,
        None => true,
    }
}

/// A lower-bound estimate of the number of blocks validated, derived from
/// the highest checkpoint.
pub fn total_blocks_estimate(checkpoints: &[Checkpoint]) -> u64 {
    checkpoints.iter().map(|c| c.height).max().unwrap_or(0)
}

/// Subsidy halving schedule knobs consumed by [`get_block_subsidy`].
///
/// The base interval is used for the first three halvings; three additional
/// "longblocks" intervals (V2a/V2b/V2c) hold the subsidy flat for one
/// halving period each before resuming normal halving.
#[derive(Copy, Clone, Debug)]
pub struct SubsidySchedule {
    /// Base halving interval, in blocks.
    pub halving_interval: u64,
    /// First post-activation longblocks interval (subsidy held flat).
    pub halving_interval_v2a: u64,
    /// Second post-activation longblocks interval (subsidy held flat).
    pub halving_interval_v2b: u64,
    /// Third post-activation longblocks interval (normal halving resumes).
    pub halving_interval_v2c: u64,
}

/// Computes the block subsidy at `height`, in the smallest unit.
///
/// The first three halving periods behave as plain geometric halving from
/// `1000 * COIN`; the next
/// two periods (spanning the V2a/V2b longblocks intervals) hold the subsidy
/// at its current value instead of halving again; halving resumes on the
/// V2c cadence thereafter, until 64 halvings have elapsed, at which point the
/// subsidy is zero.
pub fn get_block_subsidy(height: u64, schedule: &SubsidySchedule) -> u64 {
    let halvings = halving_count(height, schedule);
    if halvings >= 64 {
        return 0;
    }
    let mut subsidy = 1000 * COIN;
    let mut shift = halvings;
    // Halvings 3 and 4 (entering and crossing the V2a/V2b longblocks
    // windows) are held flat rather than halved again.
    if shift > 3 {
        shift -= (shift - 3).min(2);
    }
    subsidy >>= shift;
    subsidy
}

fn halving_count(height: u64, schedule: &SubsidySchedule) -> u64 {
    let boundary0 = schedule.halving_interval;
    let boundary1 = boundary0 + schedule.halving_interval;
    let boundary2 = boundary1 + schedule.halving_interval;
    let boundary3 = boundary2 + schedule.halving_interval_v2a;
    let boundary4 = boundary3 + schedule.halving_interval_v2b;
    if height < boundary0 {
        0
    } else if height < boundary1 {
        1
    } else if height < boundary2 {
        2
    } else if height < boundary3 {
        3
    } else if height < boundary4 {
        4
    } else {
        5 + (height - boundary4) / schedule.halving_interval_v2c
    }
}
