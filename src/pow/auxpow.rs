// SPDX-License-Identifier: CC0-1.0

//! PoW verifier: the plain proof-of-work range check and the merge-mined
//! (AuxPoW) header validation wrapped around it.

use core::fmt;

use bitcoin_hashes::{sha256, Hash};

use crate::blockdata::block::{Algorithm, BlockHeader, VERSION_AUXPOW};
use crate::consensus::params::Params;
use crate::pow::algo::pow_hash;
use crate::util::uint::Uint256;

/// Algorithms historically permitted to carry an AuxPoW payload.
const AUXPOW_PERMITTED_ALGOS: [Algorithm; 2] = [Algorithm::Sha256d, Algorithm::Scrypt];

/// Why a header failed proof-of-work validation. Diagnostic only — the core
/// never branches on a specific variant, it only reports pass/fail plus a
/// reason.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PowError {
    /// `bits` decodes to a negative, zero, overflowing, or out-of-range
    /// target.
    Range,
    /// The hash exceeds the decoded target.
    HashExceedsTarget,
    /// A non-legacy header's declared chain id doesn't match
    /// [`Params::auxpow_chain_id`] under `StrictChainId`.
    ChainIdMismatch,
    /// The header's version flags AuxPoW but no payload was supplied.
    AuxpowAbsentButFlagged,
    /// An AuxPoW payload was supplied but the header's version doesn't flag
    /// it.
    AuxpowPresentButNotFlagged,
    /// The header's algorithm isn't in the permitted merge-mined set.
    AlgoNotPermittedForAuxpow,
    /// The AuxPoW payload failed its own parent-chain check.
    AuxpowParentInvalid,
}

impl fmt::Display for PowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PowError::Range => "target out of range",
            PowError::HashExceedsTarget => "hash exceeds target",
            PowError::ChainIdMismatch => "chain id does not match auxpow_chain_id",
            PowError::AuxpowAbsentButFlagged => "version flags auxpow but no payload was given",
            PowError::AuxpowPresentButNotFlagged => "auxpow payload given but version does not flag it",
            PowError::AlgoNotPermittedForAuxpow => "algorithm is not permitted for merge mining",
            PowError::AuxpowParentInvalid => "auxpow parent-chain proof is invalid",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for PowError {}

/// Merge-mined parent-chain proof, supplied by an external collaborator: the
/// core never parses a parent-chain coinbase, Merkle branch, or block header
/// itself.
pub trait AuxPowProof {
    /// Checks this payload proves merge-mining of `own_hash` under
    /// `expected_chain_id`.
    fn check(&self, own_hash: [u8; 32], expected_chain_id: i32, params: &Params) -> bool;
    /// The parent chain's own proof-of-work hash for `algo`.
    fn parent_pow_hash(&self, algo: Algorithm) -> Uint256;
}

/// A header's version is "legacy" if it predates the AuxPoW/chain-id bits
/// entirely — it can only ever declare SHA256D and carries no chain id.
fn is_legacy_version(version: i32) -> bool {
    (version as u32) < VERSION_AUXPOW as u32
}

fn header_identity_hash(header: &BlockHeader) -> [u8; 32] {
    let first = sha256::Hash::hash(&header.serialize());
    let second = sha256::Hash::hash(first.as_ref());
    *second.as_ref()
}

/// `check_proof_of_work`: does `hash` satisfy the target `bits` decodes to?
///
/// `algo` is accepted for signature symmetry with the dispatch call site,
/// but the range/comparison check itself is algorithm agnostic.
pub fn check_proof_of_work(hash: Uint256, _algo: Algorithm, bits: u32, params: &Params) -> Result<(), PowError> {
    let (target, negative, overflow) = Uint256::from_compact(bits);
    if negative || overflow || target.is_zero() || target > params.pow_limit {
        return Err(PowError::Range);
    }
    if hash > target {
        return Err(PowError::HashExceedsTarget);
    }
    Ok(())
}

/// `check_auxpow_proof_of_work`: validates `header` end to end, dispatching
/// to the merge-mined parent-chain proof when one is supplied.
///
/// `height ≥ StartAuxPow` is not re-checked here; that gate belongs to the
/// block-acceptance layer.
pub fn check_auxpow_proof_of_work<P: AuxPowProof>(
    header: &BlockHeader,
    auxpow: Option<&P>,
    params: &Params,
) -> Result<(), PowError> {
    let algo = header.algo();

    if !is_legacy_version(header.version)
        && params.strict_chain_id
        && header.chain_id() != params.auxpow_chain_id as i32
    {
        return Err(PowError::ChainIdMismatch);
    }

    match auxpow {
        None => {
            if header.is_auxpow() {
                return Err(PowError::AuxpowAbsentButFlagged);
            }
            let yescrypt_active = header.time >= params.time_yescrypt_start;
            let hash = pow_hash(algo, &header.serialize(), yescrypt_active);
            check_proof_of_work(hash, algo, header.bits, params)
        }
        Some(proof) => {
            if !header.is_auxpow() {
                return Err(PowError::AuxpowPresentButNotFlagged);
            }
            if !AUXPOW_PERMITTED_ALGOS.contains(&algo) {
                return Err(PowError::AlgoNotPermittedForAuxpow);
            }
            let own_hash = header_identity_hash(header);
            if !proof.check(own_hash, params.auxpow_chain_id as i32, params) {
                return Err(PowError::AuxpowParentInvalid);
            }
            check_proof_of_work(proof.parent_pow_hash(algo), algo, header.bits, params)
        }
    }
}
