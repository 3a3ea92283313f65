// SPDX-License-Identifier: CC0-1.0

//! Proof-of-work: hash dispatch, retarget engine, work accounting and the
//! PoW verifier.

pub mod algo;
pub mod auxpow;
pub mod retarget;
pub mod work;

pub use self::algo::pow_hash;
pub use self::auxpow::{check_auxpow_proof_of_work, check_proof_of_work, AuxPowProof, PowError};
pub use self::retarget::get_next_work_required;
pub use self::work::{block_proof, chain_work, equivalent_time};
