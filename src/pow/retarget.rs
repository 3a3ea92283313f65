// SPDX-License-Identifier: CC0-1.0

//! Retarget engine: computes the next compact target from chain history,
//! and the sequential-same-algo cap consumed by block acceptance.

use crate::blockdata::block::{Algorithm, NUM_ALGOS};
use crate::chain::{last_for_algo_matching, BlockIndexStore, BlockIndexView};
use crate::consensus::params::{Params, RetargetFamily, TimeWarpMitigation};
use crate::util::uint::Uint256;

/// `get_next_work_required`: the compact target a new header at `new_time`
/// mining algorithm `algo` must satisfy, given the current tip `last`.
///
/// Always returns a valid compact encoding of a target `≤ pow_limit`; never
/// fails — degenerate histories fall back to `pow_limit`.
pub fn get_next_work_required<S: BlockIndexStore>(
    store: &S,
    last: Option<S::Ref>,
    new_time: u32,
    algo: Algorithm,
    params: &Params,
) -> u32
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let pow_limit_compact = params.pow_limit.to_compact();
    let last_ref = match last {
        Some(r) => r,
        None => return pow_limit_compact,
    };

    if params.no_pow_retargeting {
        return store.get(last_ref).bits();
    }

    if params.allow_min_difficulty_blocks {
        let last_time = store.get(last_ref).time();
        if new_time as i64 > last_time as i64 + 2 * params.pow_target_spacing as i64 {
            return pow_limit_compact;
        }
    }

    match params.retarget_family {
        RetargetFamily::NoRetarget => store.get(last_ref).bits(),
        RetargetFamily::Kgw => kgw(store, last_ref, new_time, algo, params),
        RetargetFamily::Dgw3 => dgw3(store, last_ref, new_time, algo, params),
        RetargetFamily::WindowV1V2 => {
            let prev_ref = match last_for_algo_matching(store, last_ref, algo) {
                Some(r) => r,
                None => return pow_limit_compact,
            };
            let mut first_ref = prev_ref;
            for _ in 0..(params.averaging_interval.saturating_sub(1)) {
                let p = match store.get(first_ref).prev() {
                    Some(p) => p,
                    None => return pow_limit_compact,
                };
                first_ref = match last_for_algo_matching(store, p, algo) {
                    Some(r) => r,
                    None => return pow_limit_compact,
                };
            }
            window_v1v2(store, last_ref, prev_ref, first_ref, algo, params)
        }
    }
}

fn window_v1v2<S: BlockIndexStore>(
    store: &S,
    last: S::Ref,
    prev: S::Ref,
    first_node: S::Ref,
    algo: Algorithm,
    params: &Params,
) -> u32
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let height = store.get(last).height();
    let mut first = first_node;
    let actual_timespan: i64;

    match params.time_warp_mitigation(height) {
        TimeWarpMitigation::None => {
            actual_timespan = store.get(prev).time() as i64 - store.get(first).time() as i64;
        }
        TimeWarpMitigation::Swap1 => {
            if let Some(swapped) = swap_candidate(store, first, algo) {
                first = swapped;
            }
            actual_timespan = store.get(prev).time() as i64 - store.get(first).time() as i64;
            if actual_timespan < 0 {
                return store.get(prev).bits();
            }
        }
        TimeWarpMitigation::SwapLoop => {
            for _ in 0..params.averaging_interval {
                match swap_candidate(store, first, algo) {
                    Some(swapped) => first = swapped,
                    None => break,
                }
            }
            actual_timespan = store.get(prev).time() as i64 - store.get(first).time() as i64;
            if actual_timespan < 0 {
                return store.get(prev).bits();
            }
        }
        TimeWarpMitigation::MedianTimePast => {
            actual_timespan = store.get(prev).median_time_past() - store.get(first).median_time_past();
        }
    }

    let spacing = params.target_spacing(height);
    let target_spacing_per_algo = spacing * NUM_ALGOS as u64;
    let averaging_timespan = params.averaging_interval * target_spacing_per_algo;
    let max_up = params.max_adjust_up(height) as i64;
    let max_dn = params.max_adjust_down as i64;
    let min_timespan = averaging_timespan as i64 * (100 - max_up) / 100;
    let max_timespan = averaging_timespan as i64 * (100 + max_dn) / 100;
    let clamped = actual_timespan.clamp(min_timespan, max_timespan).max(1) as u64;

    let (prev_target, negative, overflow) = Uint256::from_compact(store.get(prev).bits());
    if negative || overflow {
        return params.pow_limit.to_compact();
    }
    let scaled = prev_target.checked_mul_u64(clamped).unwrap_or(Uint256::MAX);
    let mut new_target = scaled.div_u64(averaging_timespan.max(1));
    if new_target > params.pow_limit {
        new_target = params.pow_limit;
    }
    new_target.to_compact()
}

/// Returns the same-algo predecessor-of-`first` when its timestamp is later
/// than `first`'s (the warp swap candidate), or `None` if there's no such
/// predecessor or it wouldn't be a swap.
fn swap_candidate<S: BlockIndexStore>(store: &S, first: S::Ref, algo: Algorithm) -> Option<S::Ref>
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let p = store.get(first).prev()?;
    let candidate = last_for_algo_matching(store, p, algo)?;
    if store.get(candidate).time() > store.get(first).time() {
        Some(candidate)
    } else {
        None
    }
}

fn kgw<S: BlockIndexStore>(store: &S, last: S::Ref, new_time: u32, algo: Algorithm, params: &Params) -> u32
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let spacing = params.target_spacing(store.get(last).height());
    let past_blocks_max = (7 * 24 * 3600) / (spacing * NUM_ALGOS as u64);
    let past_blocks_min = (past_blocks_max / 2).max(1);

    let mut cur = match last_for_algo_matching(store, last, algo) {
        Some(r) => r,
        None => return params.pow_limit.to_compact(),
    };

    let mut avg = Uint256::ZERO;
    let mut i: u64 = 0;
    let mut oldest = cur;
    loop {
        i += 1;
        let (target, _, _) = Uint256::from_compact(store.get(cur).bits());
        if i == 1 {
            avg = target;
        } else {
            let scaled = avg.checked_mul_u64(i - 1).unwrap_or(Uint256::MAX).saturating_add(target);
            avg = scaled.div_u64(i);
        }
        oldest = cur;

        if i >= past_blocks_max {
            break;
        }

        let elapsed = (new_time as i64 - store.get(oldest).time() as i64).max(1) as f64;
        let target_elapsed = spacing as f64 * NUM_ALGOS as f64 * i as f64;
        let ratio = elapsed / target_elapsed;
        let deviation = 1.0 + 0.7084 * (i as f64 / 144.0).powf(-1.228);
        if i >= past_blocks_min && ratio >= 1.0 / deviation && ratio <= deviation {
            break;
        }

        cur = match store.get(cur).prev().and_then(|p| last_for_algo_matching(store, p, algo)) {
            Some(r) => r,
            None => break,
        };
    }

    let actual_seconds = (new_time as i64 - store.get(oldest).time() as i64).max(1) as u64;
    let target_seconds = (spacing * NUM_ALGOS as u64 * i).max(1);
    let scaled = avg.checked_mul_u64(actual_seconds).unwrap_or(Uint256::MAX);
    let mut new_target = scaled.div_u64(target_seconds);
    if new_target > params.pow_limit || new_target.is_zero() {
        new_target = params.pow_limit;
    }
    new_target.to_compact()
}

fn dgw3<S: BlockIndexStore>(store: &S, last: S::Ref, new_time: u32, algo: Algorithm, params: &Params) -> u32
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    const PAST_BLOCKS: u64 = 24;
    if store.get(last).height() < PAST_BLOCKS {
        return params.pow_limit.to_compact();
    }

    if params.allow_min_difficulty_blocks {
        let last_time = store.get(last).time();
        if new_time as i64 > last_time as i64 + 2 * 3600 {
            return params.pow_limit.to_compact();
        }
        if new_time as i64 > last_time as i64 + params.pow_target_spacing as i64 * 4 {
            let (target, _, _) = Uint256::from_compact(store.get(last).bits());
            let mut scaled = target.checked_mul_u64(10).unwrap_or(Uint256::MAX);
            if scaled > params.pow_limit {
                scaled = params.pow_limit;
            }
            return scaled.to_compact();
        }
    }

    let mut cur = last_for_algo_matching(store, last, algo);
    let mut avg = Uint256::ZERO;
    let mut count = 0u64;
    let mut oldest = match cur {
        Some(r) => r,
        None => return params.pow_limit.to_compact(),
    };
    while let Some(r) = cur {
        count += 1;
        let (target, _, _) = Uint256::from_compact(store.get(r).bits());
        if count == 1 {
            avg = target;
        } else {
            let scaled = avg
                .checked_mul_u64(count)
                .unwrap_or(Uint256::MAX)
                .saturating_add(target);
            avg = scaled.div_u64(count + 1);
        }
        oldest = r;
        if count >= PAST_BLOCKS {
            break;
        }
        cur = store.get(r).prev().and_then(|p| last_for_algo_matching(store, p, algo));
    }
    if count < PAST_BLOCKS {
        return params.pow_limit.to_compact();
    }

    let height = store.get(last).height();
    let target_timespan = (PAST_BLOCKS * params.target_spacing(height) * NUM_ALGOS as u64) as i64;
    let mut actual_timespan = store.get(last).time() as i64 - store.get(oldest).time() as i64;
    actual_timespan = actual_timespan.clamp(target_timespan / 3, target_timespan * 3);

    let scaled = avg.checked_mul_u64(actual_timespan.max(0) as u64).unwrap_or(Uint256::MAX);
    let mut new_target = scaled.div_u64(target_timespan.max(1) as u64);
    if new_target > params.pow_limit {
        new_target = params.pow_limit;
    }
    new_target.to_compact()
}

/// Whether appending a block mining `new_algo` on top of `chain_tip` would
/// violate the height-selected sequential-same-algo cap. This is a separate
/// acceptance-hook check, not emitted by [`get_next_work_required`] itself.
pub fn sequential_algo_cap_violation<S: BlockIndexStore>(
    store: &S,
    chain_tip: Option<S::Ref>,
    new_algo: Algorithm,
    params: &Params,
) -> bool
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let height = chain_tip.map(|r| store.get(r).height() + 1).unwrap_or(0);
    let cap = match params.sequential_algo_max_count(height) {
        Some(c) => c,
        None => return false,
    };
    let mut count = 1u32;
    let mut cur = chain_tip;
    while let Some(r) = cur {
        if store.get(r).algo() != new_algo {
            break;
        }
        count += 1;
        if count > cap {
            return true;
        }
        cur = store.get(r).prev();
    }
    false
}
