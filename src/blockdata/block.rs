// SPDX-License-Identifier: CC0-1.0

//! Block header and the algorithm/AuxPoW bitfields packed into its version.
//!
//! The core never constructs or parses a full block (transactions, Merkle
//! trees and scripts are external collaborators); only the fixed 80-byte
//! header is modeled here, since that is what both the block identity hash
//! and the per-algorithm PoW hash operate on.

/// The closed enumeration of proof-of-work algorithms this chain admits.
///
/// The fifth slot (`YescryptOrQubit`) is a single version-bit pattern whose
/// underlying hash function depends on the header's timestamp relative to
/// [`crate::consensus::params::Params::time_yescrypt_start`] — see
/// [`crate::pow::algo::pow_hash`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Algorithm {
    /// Double SHA-256, the original Bitcoin algorithm.
    Sha256d = 0,
    /// Scrypt(N=1024, r=1, p=1).
    Scrypt = 1,
    /// Groestl-512, truncated to 256 bits.
    Groestl = 2,
    /// Skein-512, truncated to 256 bits.
    Skein = 3,
    /// Qubit before the Yescrypt activation time, Yescrypt after.
    YescryptOrQubit = 4,
}

/// Number of concurrent mining algorithms.
pub const NUM_ALGOS: usize = 5;

impl Algorithm {
    /// All algorithm ids, in index order.
    pub const ALL: [Algorithm; NUM_ALGOS] = [
        Algorithm::Sha256d,
        Algorithm::Scrypt,
        Algorithm::Groestl,
        Algorithm::Skein,
        Algorithm::YescryptOrQubit,
    ];

    /// The algorithm's index, `0..NUM_ALGOS`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks up an algorithm by its index. Returns `None` outside `0..5`.
    pub fn from_index(idx: usize) -> Option<Algorithm> {
        Algorithm::ALL.get(idx).copied()
    }
}

/// Mask over `nVersion` selecting the 4-bit algorithm field.
pub const BLOCK_VERSION_ALGO: i32 = 0x1e00;
const ALGO_SHIFT: u32 = 9;
const BLOCK_VERSION_SCRYPT: i32 = 2 << ALGO_SHIFT;
const BLOCK_VERSION_GROESTL: i32 = 3 << ALGO_SHIFT;
const BLOCK_VERSION_SKEIN: i32 = 4 << ALGO_SHIFT;
const BLOCK_VERSION_YESCRYPT: i32 = 5 << ALGO_SHIFT;

/// AuxPoW presence flag bit in `nVersion`.
pub const VERSION_AUXPOW: i32 = 1 << 8;
/// Scale factor for the merge-mined parent chain id packed into the high
/// bits of `nVersion`.
pub const VERSION_CHAIN_START: i32 = 1 << 16;

/// Decodes the mining algorithm from a header's `nVersion` field.
///
/// Mirrors `GetAlgo` in the original C++ (`primitives/pureheader.cpp`):
/// default to SHA256D when the algo field matches none of the known
/// patterns.
pub fn algo_from_version(version: i32) -> Algorithm {
    match version & BLOCK_VERSION_ALGO {
        0 => Algorithm::Sha256d,
        v if v == BLOCK_VERSION_SCRYPT => Algorithm::Scrypt,
        v if v == BLOCK_VERSION_GROESTL => Algorithm::Groestl,
        v if v == BLOCK_VERSION_SKEIN => Algorithm::Skein,
        v if v == BLOCK_VERSION_YESCRYPT => Algorithm::YescryptOrQubit,
        _ => Algorithm::Sha256d,
    }
}

/// Encodes `algo` into the version field's algorithm bits, leaving all other
/// bits of `base_version` untouched. Exposed for test fixtures that build
/// synthetic headers.
pub fn version_with_algo(base_version: i32, algo: Algorithm) -> i32 {
    let bits = match algo {
        Algorithm::Sha256d => 0,
        Algorithm::Scrypt => BLOCK_VERSION_SCRYPT,
        Algorithm::Groestl => BLOCK_VERSION_GROESTL,
        Algorithm::Skein => BLOCK_VERSION_SKEIN,
        Algorithm::YescryptOrQubit => BLOCK_VERSION_YESCRYPT,
    };
    (base_version & !BLOCK_VERSION_ALGO) | bits
}

/// True if `nVersion` flags the header as carrying an AuxPoW payload.
pub fn is_auxpow_version(version: i32) -> bool {
    version & VERSION_AUXPOW != 0
}

/// Extracts the merge-mined parent chain id packed above
/// [`VERSION_CHAIN_START`].
pub fn chain_id_from_version(version: i32) -> i32 {
    version / VERSION_CHAIN_START
}

/// A classic 80-byte block header: the only block-level data this core
/// operates on (transactions, Merkle trees and script are out of scope).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BlockHeader {
    /// Version field; also carries the algorithm id, AuxPoW flag, and (for
    /// merge-mined chains) the parent chain id.
    pub version: i32,
    /// Hash of the previous block's header.
    pub prev_blockhash: [u8; 32],
    /// Root of this block's transaction Merkle tree (opaque to the core).
    pub merkle_root: [u8; 32],
    /// Block timestamp, seconds since the UNIX epoch.
    pub time: u32,
    /// Compact-encoded target this header must satisfy.
    pub bits: u32,
    /// Miner-chosen nonce.
    pub nonce: u32,
}

impl BlockHeader {
    /// Serializes the header into its canonical 80-byte wire form.
    pub fn serialize(&self) -> [u8; 80] {
        let mut out = [0u8; 80];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.prev_blockhash);
        out[36..68].copy_from_slice(&self.merkle_root);
        out[68..72].copy_from_slice(&self.time.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// The mining algorithm this header declares via its version bits.
    pub fn algo(&self) -> Algorithm {
        algo_from_version(self.version)
    }

    /// True if this header's version flags an AuxPoW payload.
    pub fn is_auxpow(&self) -> bool {
        is_auxpow_version(self.version)
    }

    /// The merge-mined parent chain id this header declares.
    pub fn chain_id(&self) -> i32 {
        chain_id_from_version(self.version)
    }
}
