// Written in 2014 by Andrew Poelstra <apoelstra@wpsoftware.net>
// SPDX-License-Identifier: CC0-1.0

//! Consensus parameters: the static, per-network constant table that
//! drives the retarget engine, work accounting and PoW verifier.
//!
//! This module provides a predefined, immutable set of parameters for each
//! network (main, test, regtest), plus a process-wide initialize-once handle
//! so a host application selects a network exactly once at startup.

use std::sync::OnceLock;

use crate::blockdata::block::NUM_ALGOS;
use crate::blockdata::constants::{
    checkpoints, genesis_params, Checkpoint, GenesisParams, SubsidySchedule,
};
use crate::network::constants::Network;
use crate::util::uint::Uint256;

/// Which retarget strategy a network uses.
///
/// The source duplicates a full retarget code path per historical fork
/// lineage; this tag plus [`Params`]'s activation heights replace that with
/// one engine selected per `(network, height)`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RetargetFamily {
    /// The windowed V1/V2 retarget (with longblocks cascading).
    WindowV1V2,
    /// Kimoto Gravity Well, an alternate-lineage variant.
    Kgw,
    /// DarkGravityWave v3, an alternate-lineage variant.
    Dgw3,
    /// Retargeting disabled; every block uses `pow_limit` (regtest).
    NoRetarget,
}

/// Time-warp mitigation variant, selected by the height of the tip.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimeWarpMitigation {
    /// No mitigation (historical blocks below `BlockTimeWarpPreventStart1`).
    None,
    /// Swap `first` for its same-chain predecessor once if timestamps are
    /// out of order.
    Swap1,
    /// Repeat the swap until timestamps are monotonic, bounded by the
    /// averaging window length.
    SwapLoop,
    /// Use median-time-past deltas instead of raw timestamps; no swap.
    MedianTimePast,
}

/// A BIP9-style deployment record, consumed read-only: the core resolves an
/// already-decided activation state from it but does not run the signaling
/// tally itself.
#[derive(Copy, Clone, Debug)]
pub struct Deployment {
    /// Bit position within `nVersion`.
    pub bit: u8,
    /// Median-time-past at which miner signaling begins.
    pub start_time: i64,
    /// Median-time-past after which the deployment attempt is abandoned.
    pub timeout: i64,
}

/// `nStartTime` sentinel meaning the deployment is always considered active.
pub const ALWAYS_ACTIVE: i64 = -1;
/// `nTimeout` sentinel meaning the deployment attempt never expires.
pub const NO_TIMEOUT: i64 = i64::MAX;

/// Parameters that influence chain consensus for one network.
///
/// An immutable record; see [`current`]/[`set_current`] for the process-wide
/// initialize-once handle.
#[derive(Clone, Debug)]
pub struct Params {
    /// Network this record is valid for.
    pub network: Network,
    /// Genesis header constants and the hash they must reproduce.
    pub genesis: GenesisParams,
    /// Embedded (height, hash) checkpoint pairs, exposed by value.
    pub checkpoints: &'static [Checkpoint],
    /// Subsidy halving schedule.
    pub subsidy: SubsidySchedule,

    /// Network-wide minimum difficulty (maximum target).
    pub pow_limit: Uint256,
    /// Generic target spacing used by the min-difficulty escape hatch,
    /// independent of the V1/V2 retarget formula's own spacing constant.
    pub pow_target_spacing: u64,
    /// V1 per-algorithm target spacing, 30s by convention.
    pub pow_target_spacing_v1: u64,
    /// V2 per-algorithm target spacing, 60s by convention.
    pub pow_target_spacing_v2: u64,
    /// Longblocks stage 1 per-algorithm target spacing, 2 minutes.
    pub pow_target_spacing_v3a: u64,
    /// Longblocks stage 2 per-algorithm target spacing, 4 minutes.
    pub pow_target_spacing_v3b: u64,
    /// Longblocks stage 3 per-algorithm target spacing, 8 minutes.
    pub pow_target_spacing_v3c: u64,
    /// Difficulty recalculation timespan, derived from the averaging window.
    pub pow_target_timespan: u64,
    /// Number of same-algo blocks in a retarget window (`N`).
    pub averaging_interval: u64,

    /// Percent widening permitted per retarget window.
    pub max_adjust_down: u64,
    /// Percent tightening permitted per retarget window, pre-V2.
    pub max_adjust_up_v1: u64,
    /// Percent tightening permitted per retarget window, V2 onward.
    pub max_adjust_up_v2: u64,

    /// Whether the min-difficulty escape hatch is enabled (testnet/regtest).
    pub allow_min_difficulty_blocks: bool,
    /// Whether retargeting is disabled entirely (regtest).
    pub no_pow_retargeting: bool,
    /// Which retarget family this network uses.
    pub retarget_family: RetargetFamily,

    /// Height at which time-warp mitigation variant 1 begins.
    pub block_time_warp_prevent_start1: u64,
    /// Height at which time-warp mitigation variant 2 begins.
    pub block_time_warp_prevent_start2: u64,
    /// Height at which time-warp mitigation variant 3 (median-time-past)
    /// begins.
    pub block_time_warp_prevent_start3: u64,

    /// Height at which the V2 retarget formula (and spacing) replaces V1.
    pub phase2timespan_start: u64,
    /// Height at which `MaxAdjustUpV2` replaces `MaxAdjustUpV1` inside V1.
    pub block_diff_adjust_v2: u64,

    /// Height at which the sequential-same-algo cap (count 1) begins.
    pub block_sequential_algo_rule_start1: u64,
    /// Height at which the sequential-same-algo cap tightens (count 2).
    pub block_sequential_algo_rule_start2: u64,
    /// Cap before `rule_start2`.
    pub sequential_algo_max_count1: u32,
    /// Cap from `rule_start2` until `fork1_min_block`.
    pub sequential_algo_max_count2: u32,
    /// Cap from `fork1_min_block` onward.
    pub sequential_algo_max_count3: u32,

    /// Height at which hardcoded per-algo work weighting activates.
    pub block_algo_work_weight_start: u64,
    /// Height at which averaged-across-algos normalized work activates.
    pub block_algo_normalised_work_start: u64,
    /// Height at which the floor-`pow_limit` decay variant activates.
    pub block_algo_normalised_work_decay_start1: u64,
    /// Height at which the floor-zero decay variant activates.
    pub block_algo_normalised_work_decay_start2: u64,
    /// Height at which geometric-mean-across-algos work activates.
    pub geo_avg_work_start: u64,
    /// Height enabling the additional algorithm-rotation fork (also the
    /// boundary where the sequential-algo cap becomes `count3`).
    pub fork1_min_block: u64,

    /// Height at which longblocks stage `a` (2-minute spacing) begins.
    pub longblocks_start_v1a: u64,
    /// Height at which longblocks stage `b` (4-minute spacing) begins.
    pub longblocks_start_v1b: u64,
    /// Height at which longblocks stage `c` (8-minute spacing) begins.
    pub longblocks_start_v1c: u64,

    /// Minimum height at which a header may carry an AuxPoW payload.
    pub start_auxpow: u64,
    /// Expected merge-mined parent chain id.
    pub auxpow_chain_id: u16,
    /// Whether non-legacy headers must declare `auxpow_chain_id` exactly.
    pub strict_chain_id: bool,

    /// Block time at which the fifth algorithm slot switches from Qubit to
    /// Yescrypt.
    pub time_yescrypt_start: u32,

    /// BIP9-style deployment records, consumed read-only.
    pub deployments: Vec<Deployment>,
}

fn limit_from_compact(bits: u32) -> Uint256 {
    Uint256::from_compact(bits).0
}

impl Params {
    /// Creates the parameter set for `network`.
    pub fn new(network: Network) -> Params {
        let genesis = genesis_params(network);
        let pow_target_spacing_v2 = 60;
        let averaging_interval = 10;
        let always_on = vec![
            Deployment { bit: 28, start_time: ALWAYS_ACTIVE, timeout: NO_TIMEOUT },
            Deployment { bit: 0, start_time: ALWAYS_ACTIVE, timeout: NO_TIMEOUT },
            Deployment { bit: 1, start_time: ALWAYS_ACTIVE, timeout: NO_TIMEOUT },
        ];
        match network {
            Network::Main => Params {
                network,
                genesis,
                checkpoints: checkpoints(network),
                subsidy: SubsidySchedule {
                    halving_interval: 967_680,
                    halving_interval_v2a: 120_960,
                    halving_interval_v2b: 120_960,
                    halving_interval_v2c: 120_960,
                },
                pow_limit: limit_from_compact(0x1e0f_ffff),
                pow_target_spacing: pow_target_spacing_v2,
                pow_target_spacing_v1: 30,
                pow_target_spacing_v2,
                pow_target_spacing_v3a: 120,
                pow_target_spacing_v3b: 240,
                pow_target_spacing_v3c: 480,
                pow_target_timespan: averaging_interval * NUM_ALGOS as u64 * pow_target_spacing_v2,
                averaging_interval,
                max_adjust_down: 4,
                max_adjust_up_v1: 4,
                max_adjust_up_v2: 4,
                allow_min_difficulty_blocks: false,
                no_pow_retargeting: false,
                retarget_family: RetargetFamily::WindowV1V2,
                block_time_warp_prevent_start1: 150_000,
                block_time_warp_prevent_start2: 300_000,
                block_time_warp_prevent_start3: 450_000,
                phase2timespan_start: 150_000,
                block_diff_adjust_v2: 150_000,
                block_sequential_algo_rule_start1: 150_000,
                block_sequential_algo_rule_start2: 300_000,
                sequential_algo_max_count1: 6,
                sequential_algo_max_count2: 3,
                sequential_algo_max_count3: 6,
                block_algo_work_weight_start: 300_000,
                block_algo_normalised_work_start: 450_000,
                block_algo_normalised_work_decay_start1: 450_000,
                block_algo_normalised_work_decay_start2: 600_000,
                geo_avg_work_start: 1_008_000,
                fork1_min_block: 1_200_000,
                longblocks_start_v1a: 1_500_000,
                longblocks_start_v1b: 1_800_000,
                longblocks_start_v1c: 2_100_000,
                start_auxpow: 1,
                auxpow_chain_id: 0x006a,
                strict_chain_id: false,
                time_yescrypt_start: 1_470_009_600,
                deployments: always_on,
            },
            Network::Test => Params {
                network,
                genesis,
                checkpoints: checkpoints(network),
                subsidy: SubsidySchedule {
                    halving_interval: 967_680,
                    halving_interval_v2a: 120_960,
                    halving_interval_v2b: 120_960,
                    halving_interval_v2c: 120_960,
                },
                pow_limit: limit_from_compact(0x1e0f_ffff),
                pow_target_spacing: pow_target_spacing_v2,
                pow_target_spacing_v1: 30,
                pow_target_spacing_v2,
                pow_target_spacing_v3a: 120,
                pow_target_spacing_v3b: 240,
                pow_target_spacing_v3c: 480,
                pow_target_timespan: averaging_interval * NUM_ALGOS as u64 * pow_target_spacing_v2,
                averaging_interval,
                max_adjust_down: 4,
                max_adjust_up_v1: 4,
                max_adjust_up_v2: 4,
                allow_min_difficulty_blocks: true,
                no_pow_retargeting: false,
                retarget_family: RetargetFamily::WindowV1V2,
                block_time_warp_prevent_start1: 0,
                block_time_warp_prevent_start2: 0,
                block_time_warp_prevent_start3: 0,
                phase2timespan_start: 0,
                block_diff_adjust_v2: 0,
                block_sequential_algo_rule_start1: 0,
                block_sequential_algo_rule_start2: 0,
                sequential_algo_max_count1: 6,
                sequential_algo_max_count2: 3,
                sequential_algo_max_count3: 6,
                block_algo_work_weight_start: 0,
                block_algo_normalised_work_start: 0,
                block_algo_normalised_work_decay_start1: 0,
                block_algo_normalised_work_decay_start2: 0,
                geo_avg_work_start: 0,
                fork1_min_block: 0,
                longblocks_start_v1a: u64::MAX,
                longblocks_start_v1b: u64::MAX,
                longblocks_start_v1c: u64::MAX,
                start_auxpow: 1,
                auxpow_chain_id: 0x006a,
                strict_chain_id: false,
                time_yescrypt_start: 1_470_009_600,
                deployments: always_on,
            },
            Network::Regtest => Params {
                network,
                genesis,
                checkpoints: checkpoints(network),
                subsidy: SubsidySchedule {
                    halving_interval: 150,
                    halving_interval_v2a: 150,
                    halving_interval_v2b: 150,
                    halving_interval_v2c: 150,
                },
                pow_limit: limit_from_compact(0x207f_ffff),
                pow_target_spacing: pow_target_spacing_v2,
                pow_target_spacing_v1: 30,
                pow_target_spacing_v2,
                pow_target_spacing_v3a: 120,
                pow_target_spacing_v3b: 240,
                pow_target_spacing_v3c: 480,
                pow_target_timespan: averaging_interval * NUM_ALGOS as u64 * pow_target_spacing_v2,
                averaging_interval,
                max_adjust_down: 4,
                max_adjust_up_v1: 4,
                max_adjust_up_v2: 4,
                allow_min_difficulty_blocks: true,
                no_pow_retargeting: true,
                retarget_family: RetargetFamily::NoRetarget,
                block_time_warp_prevent_start1: 0,
                block_time_warp_prevent_start2: 0,
                block_time_warp_prevent_start3: 0,
                phase2timespan_start: 0,
                block_diff_adjust_v2: 0,
                block_sequential_algo_rule_start1: 0,
                block_sequential_algo_rule_start2: 0,
                sequential_algo_max_count1: 6,
                sequential_algo_max_count2: 3,
                sequential_algo_max_count3: 6,
                block_algo_work_weight_start: 0,
                block_algo_normalised_work_start: 0,
                block_algo_normalised_work_decay_start1: 0,
                block_algo_normalised_work_decay_start2: 0,
                geo_avg_work_start: 0,
                fork1_min_block: 0,
                longblocks_start_v1a: u64::MAX,
                longblocks_start_v1b: u64::MAX,
                longblocks_start_v1c: u64::MAX,
                start_auxpow: 1,
                auxpow_chain_id: 0x006a,
                strict_chain_id: false,
                time_yescrypt_start: 0,
                deployments: always_on,
            },
        }
    }

    /// Calculates the number of blocks between difficulty adjustments.
    pub fn difficulty_adjustment_interval(&self) -> u64 {
        self.pow_target_timespan / self.pow_target_spacing_v2
    }

    /// Selects the time-warp mitigation variant for a tip at `height`.
    pub fn time_warp_mitigation(&self, height: u64) -> TimeWarpMitigation {
        if height >= self.block_time_warp_prevent_start3 {
            TimeWarpMitigation::MedianTimePast
        } else if height >= self.block_time_warp_prevent_start2 {
            TimeWarpMitigation::SwapLoop
        } else if height >= self.block_time_warp_prevent_start1 {
            TimeWarpMitigation::Swap1
        } else {
            TimeWarpMitigation::None
        }
    }

    /// Selects the per-algorithm target spacing for a tip at `height`,
    /// applying the V1/V2 choice and the longblocks cascade (first matching,
    /// descending-height test wins).
    pub fn target_spacing(&self, height: u64) -> u64 {
        if height < self.phase2timespan_start {
            return self.pow_target_spacing_v1;
        }
        if height >= self.longblocks_start_v1c {
            self.pow_target_spacing_v3c
        } else if height >= self.longblocks_start_v1b {
            self.pow_target_spacing_v3b
        } else if height >= self.longblocks_start_v1a {
            self.pow_target_spacing_v3a
        } else {
            self.pow_target_spacing_v2
        }
    }

    /// The `MaxAdjustUp` percentage in effect for a V1-era tip at `height`.
    pub fn max_adjust_up(&self, height: u64) -> u64 {
        if height >= self.phase2timespan_start || height >= self.block_diff_adjust_v2 {
            self.max_adjust_up_v2
        } else {
            self.max_adjust_up_v1
        }
    }

    /// The sequential-same-algo cap in effect for a tip at `height`.
    pub fn sequential_algo_max_count(&self, height: u64) -> Option<u32> {
        if height >= self.fork1_min_block {
            Some(self.sequential_algo_max_count3)
        } else if height >= self.block_sequential_algo_rule_start2 {
            Some(self.sequential_algo_max_count2)
        } else if height >= self.block_sequential_algo_rule_start1 {
            Some(self.sequential_algo_max_count1)
        } else {
            None
        }
    }
}

static CURRENT: OnceLock<Params> = OnceLock::new();

/// Sets the process-wide active parameters, once.
///
/// Returns the rejected value if the handle was already initialized: the
/// handle is not reassignable after first selection on mainnet/testnet.
/// Regtest callers that need scoped deployment-timing
/// overrides should build and thread their own [`Params`] value directly
/// rather than going through this process-wide handle, which exists only for
/// the ordinary "select once at startup" path.
pub fn set_current(params: Params) -> Result<(), Params> {
    CURRENT.set(params)
}

/// Returns the process-wide active parameters.
///
/// # Panics
///
/// Panics if [`set_current`] has not been called yet; this is a precondition
/// violation by the host application, not a core-detected fault.
pub fn current() -> &'static Params {
    CURRENT.get().expect("consensus::params::set_current was never called")
}
