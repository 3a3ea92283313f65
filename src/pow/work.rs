// SPDX-License-Identifier: CC0-1.0

//! Work accounting: per-block work, chain work, and equivalent-time.

use crate::blockdata::block::{Algorithm, NUM_ALGOS};
use crate::chain::{BlockIndexStore, BlockIndexView};
use crate::consensus::params::Params;
use crate::util::uint::{BigUint, Uint256};

/// `AlgoWorkFactor`: the fixed per-algorithm work multiplier used by the
/// weighted-work variant.
fn algo_work_factor(algo: Algorithm) -> u64 {
    match algo {
        Algorithm::Sha256d => 1,
        Algorithm::Scrypt => 4096,
        Algorithm::Groestl => 512,
        Algorithm::Skein => 24,
        Algorithm::YescryptOrQubit => 1024,
    }
}

/// `⌊2^256 / (T+1)⌋`, computed as `(~T / (T+1)) + 1`, from an already-decoded
/// target. Zero for a zero target (callers pass `pow_limit`, never zero, but
/// a decayed lookup of an all-zero synthetic target must still be safe).
fn proof_base_from_target(target: Uint256) -> Uint256 {
    if target.is_zero() {
        return Uint256::ZERO;
    }
    let (q, _) = (!target).div_rem(target.saturating_add(Uint256::ONE));
    q.saturating_add(Uint256::ONE)
}

/// `proof_base` from compact bits: zero if negative, zero, or overflowing.
fn proof_base(bits: u32) -> Uint256 {
    let (target, negative, overflow) = Uint256::from_compact(bits);
    if negative || overflow || target.is_zero() {
        return Uint256::ZERO;
    }
    proof_base_from_target(target)
}

/// Walks `prev` links from `start`, returning `(proof_base, distance)` for
/// the first node of `algo` found within `ceiling` hops, or `None`.
fn decayed_lookup<S: BlockIndexStore>(
    store: &S,
    start: Option<S::Ref>,
    algo: Algorithm,
    ceiling: u32,
) -> Option<(Uint256, u32)>
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut cur = start;
    let mut d = 1u32;
    while let Some(r) = cur {
        let n = store.get(r);
        if n.algo() == algo {
            return Some((proof_base(n.bits()), d));
        }
        if d >= ceiling {
            return None;
        }
        cur = n.prev();
        d += 1;
    }
    None
}

fn decay1<S: BlockIndexStore>(store: &S, start: Option<S::Ref>, algo: Algorithm, pow_limit: Uint256) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let floor = proof_base_from_target(pow_limit);
    match decayed_lookup(store, start, algo, 32) {
        Some((base, d)) => {
            let scaled = base
                .checked_mul_u64(32u64.saturating_sub(d as u64))
                .unwrap_or(Uint256::MAX)
                .div_u64(32);
            if scaled > floor {
                scaled
            } else {
                floor
            }
        }
        None => floor,
    }
}

fn decay2<S: BlockIndexStore>(store: &S, start: Option<S::Ref>, algo: Algorithm) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    match decayed_lookup(store, start, algo, 32) {
        Some((base, d)) => base
            .checked_mul_u64(32u64.saturating_sub(d as u64))
            .unwrap_or(Uint256::MAX)
            .div_u64(32),
        None => Uint256::ZERO,
    }
}

fn decay3<S: BlockIndexStore>(store: &S, start: Option<S::Ref>, algo: Algorithm) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    match decayed_lookup(store, start, algo, 100) {
        Some((base, d)) => base
            .checked_mul_u64(100u64.saturating_sub(d as u64))
            .unwrap_or(Uint256::MAX)
            .div_u64(100),
        None => Uint256::ZERO,
    }
}

fn undecayed_lookup<S: BlockIndexStore>(
    store: &S,
    start: Option<S::Ref>,
    algo: Algorithm,
    pow_limit: Uint256,
) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut cur = start;
    while let Some(r) = cur {
        let n = store.get(r);
        if n.algo() == algo {
            return proof_base(n.bits());
        }
        cur = n.prev();
    }
    proof_base_from_target(pow_limit)
}

fn normalised_work<S: BlockIndexStore>(
    store: &S,
    prev: Option<S::Ref>,
    height: u64,
    algo: Algorithm,
    base: Uint256,
    params: &Params,
) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut sum = base;
    for &other in Algorithm::ALL.iter() {
        if other == algo {
            continue;
        }
        let w = if height >= params.block_algo_normalised_work_decay_start2 {
            decay2(store, prev, other)
        } else if height >= params.block_algo_normalised_work_decay_start1 {
            decay1(store, prev, other, params.pow_limit)
        } else {
            undecayed_lookup(store, prev, other, params.pow_limit)
        };
        sum = sum.saturating_add(w);
    }
    sum.div_u64(NUM_ALGOS as u64)
}

fn geo_avg_work<S: BlockIndexStore>(
    store: &S,
    prev: Option<S::Ref>,
    algo: Algorithm,
    base: Uint256,
    params: &Params,
) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut factors = Vec::with_capacity(NUM_ALGOS);
    factors.push(base);
    for &other in Algorithm::ALL.iter() {
        if other == algo {
            continue;
        }
        factors.push(decay3(store, prev, other));
    }
    let mut product: Option<BigUint> = None;
    for f in factors.into_iter().filter(|f| !f.is_zero()) {
        let term = BigUint::from_uint256(f);
        product = Some(match product {
            Some(p) => p.mul(&term),
            None => term,
        });
    }
    match product {
        Some(p) => p.nth_root(5).to_uint256() << 8,
        None => Uint256::ZERO,
    }
}

/// `block_proof`: the work value a block at `(height, algo, bits)` with
/// predecessor `prev` contributes to chain work.
///
/// `prev` is the candidate block's immediate predecessor, not a reference to
/// the candidate itself — the candidate need not be indexed in `store` yet,
/// matching how [`crate::pow::retarget::get_next_work_required`] also takes
/// the new header's fields directly rather than requiring it be indexed.
pub fn block_proof<S: BlockIndexStore>(
    store: &S,
    prev: Option<S::Ref>,
    height: u64,
    algo: Algorithm,
    bits: u32,
    params: &Params,
) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let base = proof_base(bits);
    if height >= params.geo_avg_work_start {
        geo_avg_work(store, prev, algo, base, params)
    } else if height >= params.block_algo_normalised_work_start {
        normalised_work(store, prev, height, algo, base, params)
    } else if height >= params.block_algo_work_weight_start {
        base.checked_mul_u64(algo_work_factor(algo)).unwrap_or(Uint256::MAX)
    } else {
        base
    }
}

/// `chain_work(block) = chain_work(prev) + block_proof(block)`, saturating.
pub fn chain_work<S: BlockIndexStore>(
    store: &S,
    prev: Option<S::Ref>,
    height: u64,
    algo: Algorithm,
    bits: u32,
    params: &Params,
) -> Uint256
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let prev_work = match prev {
        Some(r) => store.get(r).chain_work(),
        None => Uint256::ZERO,
    };
    prev_work.saturating_add(block_proof(store, prev, height, algo, bits, params))
}

/// `equivalent_time(to, from, tip) = sign · (|to − from| · spacingV2) /
/// block_proof(tip)`, saturating to `±i64::MAX`.
pub fn equivalent_time(
    to_chain_work: Uint256,
    from_chain_work: Uint256,
    tip_block_proof: Uint256,
    pow_target_spacing_v2: u64,
) -> i64 {
    if tip_block_proof.is_zero() {
        return 0;
    }
    let (diff, negative) = if to_chain_work >= from_chain_work {
        (to_chain_work.saturating_sub(from_chain_work), false)
    } else {
        (from_chain_work.saturating_sub(to_chain_work), true)
    };
    let scaled = diff.checked_mul_u64(pow_target_spacing_v2).unwrap_or(Uint256::MAX);
    let (quotient, _) = scaled.div_rem(tip_block_proof);
    let limbs = quotient.0;
    let magnitude: i64 = if limbs[1] != 0 || limbs[2] != 0 || limbs[3] != 0 || limbs[0] > i64::MAX as u64 {
        i64::MAX
    } else {
        limbs[0] as i64
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
