// SPDX-License-Identifier: CC0-1.0

//! Chain-index view and the per-algorithm selector.
//!
//! The core never mutates the chain graph and never needs forward pointers;
//! it only walks `prev` links. Nodes are addressed by a plain index type so
//! the graph can be arena-allocated by the host.

use crate::blockdata::block::Algorithm;
use crate::util::uint::Uint256;

/// Read-only view of one node in the back-linked chain-metadata graph.
///
/// Implemented by the host application's own block-index type; this core
/// never constructs or owns nodes, only borrows references to them for the
/// duration of a single call.
pub trait BlockIndexView {
    /// An opaque handle identifying another node reachable from this one.
    type Ref: Copy;

    /// This node's height (0 at genesis).
    fn height(&self) -> u64;
    /// This node's timestamp.
    fn time(&self) -> u32;
    /// Median of the 11 timestamps ending at this node.
    fn median_time_past(&self) -> i64;
    /// This node's compact-encoded target.
    fn bits(&self) -> u32;
    /// This node's declared mining algorithm.
    fn algo(&self) -> Algorithm;
    /// Cumulative chain work through this node.
    fn chain_work(&self) -> Uint256;
    /// Whether this node's header carries an AuxPoW payload.
    fn is_auxpow(&self) -> bool;
    /// The merge-mined parent chain id this node declares.
    fn chain_id(&self) -> i32;
    /// A handle to this node's predecessor, or `None` at genesis.
    fn prev(&self) -> Option<Self::Ref>;
}

/// Resolves a [`BlockIndexView::Ref`] to the node it names.
///
/// Kept as a separate trait from `BlockIndexView` because the view's `Ref`
/// type is how the host's arena actually indexes nodes (an integer, a slice
/// index, a pointer wrapper); the core only ever needs "give me the node for
/// this ref", which this trait supplies without constraining the host's
/// storage choice.
pub trait BlockIndexStore {
    /// The node type this store resolves references to.
    type Node: BlockIndexView<Ref = Self::Ref>;
    /// The reference type used to address nodes.
    type Ref: Copy;

    /// Resolves `r` to its node.
    fn get(&self, r: Self::Ref) -> &Self::Node;
}

/// Walks `prev` links from `start` until a node with algorithm `algo` is
/// found. Returns `None` on underflow (walked off the start of the chain
/// without a match) — C5's `last_for_algo`.
pub fn last_for_algo<S: BlockIndexStore>(
    store: &S,
    start: S::Ref,
) -> Option<S::Ref>
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    last_for_algo_matching(store, start, store.get(start).algo())
}

/// As [`last_for_algo`], but checks against `algo` rather than the algorithm
/// of the starting node, so callers can look for a specific algorithm
/// starting from an arbitrary tip.
pub fn last_for_algo_matching<S: BlockIndexStore>(
    store: &S,
    start: S::Ref,
    algo: Algorithm,
) -> Option<S::Ref>
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut cur = start;
    loop {
        if store.get(cur).algo() == algo {
            return Some(cur);
        }
        cur = store.get(cur).prev()?;
    }
}

/// Returns the `count` most recent same-algo predecessors of `start`
/// (`start` included if it matches `algo`, then walking strictly backward),
/// most recent first. Returns `None` if fewer than `count` are available —
/// C5's `window_for_algo`.
pub fn window_for_algo<S: BlockIndexStore>(
    store: &S,
    start: S::Ref,
    algo: Algorithm,
    count: usize,
) -> Option<Vec<S::Ref>>
where
    S::Node: BlockIndexView<Ref = S::Ref>,
{
    let mut out = Vec::with_capacity(count);
    let mut cur = last_for_algo_matching(store, start, algo)?;
    out.push(cur);
    while out.len() < count {
        let prev = store.get(cur).prev()?;
        cur = last_for_algo_matching(store, prev, algo)?;
        out.push(cur);
    }
    Some(out)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! An in-memory synthetic chain used across `pow::*` test modules.
    use super::*;

    #[derive(Clone, Debug)]
    pub struct Node {
        pub height: u64,
        pub time: u32,
        pub median_time_past: i64,
        pub bits: u32,
        pub algo: Algorithm,
        pub chain_work: Uint256,
        pub is_auxpow: bool,
        pub chain_id: i32,
        pub prev: Option<usize>,
    }

    impl BlockIndexView for Node {
        type Ref = usize;
        fn height(&self) -> u64 {
            self.height
        }
        fn time(&self) -> u32 {
            self.time
        }
        fn median_time_past(&self) -> i64 {
            self.median_time_past
        }
        fn bits(&self) -> u32 {
            self.bits
        }
        fn algo(&self) -> Algorithm {
            self.algo
        }
        fn chain_work(&self) -> Uint256 {
            self.chain_work
        }
        fn is_auxpow(&self) -> bool {
            self.is_auxpow
        }
        fn chain_id(&self) -> i32 {
            self.chain_id
        }
        fn prev(&self) -> Option<usize> {
            self.prev
        }
    }

    pub struct Chain(pub Vec<Node>);

    impl BlockIndexStore for Chain {
        type Node = Node;
        type Ref = usize;
        fn get(&self, r: usize) -> &Node {
            &self.0[r]
        }
    }

    /// Builds a chain of `len` blocks cycling through all five algorithms in
    /// round-robin order, `spacing` seconds apart, all at `bits`.
    pub fn round_robin_chain(len: usize, spacing: u32, bits: u32) -> Chain {
        let mut nodes = Vec::with_capacity(len);
        for i in 0..len {
            let algo = Algorithm::from_index(i % 5).unwrap();
            let time = 1_600_000_000u32.wrapping_add(i as u32 * spacing);
            nodes.push(Node {
                height: i as u64,
                time,
                median_time_past: time as i64,
                bits,
                algo,
                chain_work: Uint256::from_u64(i as u64 + 1),
                is_auxpow: false,
                chain_id: 0,
                prev: if i == 0 { None } else { Some(i - 1) },
            });
        }
        Chain(nodes)
    }
}
