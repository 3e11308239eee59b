use crate::{path_string, Chain, ChainNode, Interval, LinearRule, Reach, Result, Selection, F};
use log::{debug, log_enabled, Level};
use serde::Serialize;
use std::collections::VecDeque;

/// Configuration for bounds-tree construction
#[derive(Clone, Debug)]
pub struct BoundsConfig {
    pub use_parallel: bool,         // Build sibling subtrees with rayon::join
    pub parallel_min_levels: usize, // Only fork when at least this many levels remain below
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            use_parallel: true,
            parallel_min_levels: 6,
        }
    }
}

impl BoundsConfig {
    pub fn sequential() -> Self {
        Self {
            use_parallel: false,
            ..Self::default()
        }
    }
}

/// 2^k, or `None` when it does not fit in a usize
fn pow2(k: usize) -> Option<usize> {
    1usize.checked_shl(u32::try_from(k).ok()?)
}

/// Number of nodes in the bounds tree of an `n`-node chain, virtual root
/// included. `None` when the count overflows a usize.
pub fn tree_node_count(n: usize) -> Option<usize> {
    pow2(n.checked_add(1)?).map(|p| p - 1)
}

/// Number of analysis nodes at chain depth `depth`, `None` on overflow
pub fn level_width(depth: usize) -> Option<usize> {
    pow2(depth.checked_add(1)?)
}

/// Breadth-first index of the first node at `depth`. Chains are capped at
/// `MAX_CHAIN_LEN`, so this never overflows for a built tree.
fn level_start(depth: usize) -> usize {
    (2usize << depth) - 2
}

/// Analysis of one selection sequence, ending at chain index `depth`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundsNode {
    depth: usize,
    selection: Selection,
    reach: Reach,
    left: Option<Box<BoundsNode>>,  // next node selects A
    right: Option<Box<BoundsNode>>, // next node selects B
}

impl BoundsNode {
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Rule this node evaluates
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn reach(&self) -> &Reach {
        &self.reach
    }

    pub fn is_dead(&self) -> bool {
        self.reach.is_dead()
    }

    pub fn interval(&self) -> Option<&Interval> {
        self.reach.interval()
    }

    pub fn left(&self) -> Option<&BoundsNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&BoundsNode> {
        self.right.as_deref()
    }

    pub fn child(&self, selection: Selection) -> Option<&BoundsNode> {
        match selection {
            Selection::A => self.left(),
            Selection::B => self.right(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Nodes in this subtree, self included
    pub fn subtree_len(&self) -> usize {
        1 + self.left().map_or(0, BoundsNode::subtree_len) + self.right().map_or(0, BoundsNode::subtree_len)
    }
}

/// Entry of a breadth-first listing of the tree
#[derive(Clone, Copy, Debug)]
pub struct LevelEntry<'a> {
    pub index: usize,    // position in breadth-first order, 0 = depth-0 A node
    pub depth: usize,    // chain index analyzed
    pub position: usize, // position within its level
    pub node: &'a BoundsNode,
}

impl LevelEntry<'_> {
    /// Selections from depth 0 down to this node.
    ///
    /// Children are enqueued A before B, so the bits of `position`, most
    /// significant first, spell the path with 0 for A and 1 for B.
    pub fn path(&self) -> Vec<Selection> {
        (0..=self.depth)
            .rev()
            .map(|bit| {
                if (self.position >> bit) & 1 == 0 {
                    Selection::A
                } else {
                    Selection::B
                }
            })
            .collect()
    }

    pub fn path_string(&self) -> String {
        path_string(&self.path())
    }
}

/// Alive/dead totals of a built tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoundsSummary {
    pub chain_len: usize,
    pub node_count: usize, // virtual root included
    pub alive: usize,
    pub dead: usize,
}

/// Reachable output intervals for every rule-selection sequence of a chain.
///
/// The virtual root (depth -1) is implicit; it fans out into the two
/// depth-0 nodes held here. Built once and never updated: any parameter
/// change requires a fresh build.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundsTree {
    chain_len: usize,
    a: BoundsNode,
    b: BoundsNode,
}

/// Output interval of `node` under `selection`, given the parent's interval.
///
/// The output is affine in the input, so its extrema over the feasible
/// input set lie at endpoints of that set. Those endpoints are among the
/// parent bounds, the node's threshold and the thresholds of shallower
/// nodes; candidates outside the parent interval or on the wrong side of the
/// threshold are discarded. No surviving candidate means the sequence is
/// dead. A dead parent passes `None`, which no candidate can satisfy.
fn feasible_outputs(
    parent: Option<Interval>,
    node: &ChainNode,
    selection: Selection,
    ancestor_thresholds: &[F],
) -> Option<Interval> {
    let parent = parent?;
    let t = node.threshold();
    let rule: &LinearRule = node.rule(selection);

    let candidates = [parent.max(), parent.min(), t]
        .into_iter()
        .chain(ancestor_thresholds.iter().copied());

    Interval::hull(
        candidates
            .filter(|&x| parent.contains(x) && selection.admits(x, t))
            .map(|x| rule.evaluate(x)),
    )
}

/// Build the node for `selection` at `depth`, then both of its children
fn build_node(
    nodes: &[ChainNode],
    thresholds: &[F],
    depth: usize,
    selection: Selection,
    parent: Option<Interval>,
    config: &BoundsConfig,
) -> BoundsNode {
    let outputs = feasible_outputs(parent, &nodes[depth], selection, &thresholds[..depth]);

    let (left, right) = if depth + 1 < nodes.len() {
        let remaining = nodes.len() - depth - 1;
        let child = |s: Selection| Box::new(build_node(nodes, thresholds, depth + 1, s, outputs, config));

        let (l, r) = if config.use_parallel && remaining >= config.parallel_min_levels {
            rayon::join(|| child(Selection::A), || child(Selection::B))
        } else {
            (child(Selection::A), child(Selection::B))
        };
        (Some(l), Some(r))
    } else {
        (None, None)
    };

    BoundsNode {
        depth,
        selection,
        reach: Reach::from(outputs),
        left,
        right,
    }
}

impl BoundsTree {
    /// Analyze every selection sequence of `chain`. `None` for an empty chain.
    pub fn build(chain: &Chain, config: &BoundsConfig) -> Option<Self> {
        let nodes = chain.nodes();
        if nodes.is_empty() {
            debug!("empty chain, no bounds tree");
            return None;
        }

        let thresholds = chain.thresholds();
        let root = |s: Selection| build_node(nodes, &thresholds, 0, s, Some(Interval::UNIT), config);
        let (a, b) = if config.use_parallel && nodes.len() >= config.parallel_min_levels {
            rayon::join(|| root(Selection::A), || root(Selection::B))
        } else {
            (root(Selection::A), root(Selection::B))
        };

        let tree = Self {
            chain_len: nodes.len(),
            a,
            b,
        };
        if log_enabled!(Level::Debug) {
            let s = tree.summary();
            debug!(
                "built bounds tree for {} chain nodes: {} nodes, {} alive, {} dead",
                s.chain_len, s.node_count, s.alive, s.dead
            );
        }
        Some(tree)
    }

    /// Validate raw (rule A, rule B, threshold) triples, then build.
    ///
    /// Chains longer than `MAX_CHAIN_LEN` are rejected before any node is built.
    pub fn from_params(params: &[(LinearRule, LinearRule, F)], config: &BoundsConfig) -> Result<Option<Self>> {
        let chain = Chain::from_params(params)?;
        Ok(Self::build(&chain, config))
    }

    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Depth-0 node for `selection`
    pub fn root(&self, selection: Selection) -> &BoundsNode {
        match selection {
            Selection::A => &self.a,
            Selection::B => &self.b,
        }
    }

    /// Node reached by following `path` from the virtual root
    pub fn find(&self, path: &[Selection]) -> Option<&BoundsNode> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.root(*first), |node, &s| node.child(s))
    }

    /// Nodes actually materialized, virtual root included
    pub fn node_count(&self) -> usize {
        1 + self.a.subtree_len() + self.b.subtree_len()
    }

    /// Breadth-first listing: both depth-0 nodes, then their children, and so on
    pub fn level_order(&self) -> Vec<LevelEntry<'_>> {
        let mut entries = Vec::with_capacity(level_start(self.chain_len));
        let mut queue = VecDeque::from([&self.a, &self.b]);

        while let Some(node) = queue.pop_front() {
            let index = entries.len();
            entries.push(LevelEntry {
                index,
                depth: node.depth,
                position: index - level_start(node.depth),
                node,
            });
            queue.extend(node.left());
            queue.extend(node.right());
        }

        entries
    }

    /// Leaves, one per complete selection sequence, in breadth-first order
    pub fn leaves(&self) -> Vec<LevelEntry<'_>> {
        self.level_order()
            .into_iter()
            .filter(|e| e.node.is_leaf())
            .collect()
    }

    pub fn summary(&self) -> BoundsSummary {
        let entries = self.level_order();
        let dead = entries.iter().filter(|e| e.node.is_dead()).count();
        BoundsSummary {
            chain_len: self.chain_len,
            node_count: entries.len() + 1,
            alive: entries.len() - dead,
            dead,
        }
    }
}
