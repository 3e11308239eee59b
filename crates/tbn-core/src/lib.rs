pub mod rule;
pub mod chain;
pub mod interval;
pub mod bounds;
pub mod error;

pub use rule::{path_string, LinearRule, Selection};
pub use chain::{Chain, ChainNode, NodeOutput};
pub use interval::{Interval, Reach};
pub use bounds::{
    level_width, tree_node_count, BoundsConfig, BoundsNode, BoundsSummary, BoundsTree, LevelEntry,
};
pub use error::{Param, Result, TbnError};

/// Core types
pub type F = f64;
pub type NodeIndex = usize;

/// Default evidence fed into the first chain node
pub const DEFAULT_EVIDENCE: F = 0.5;

/// Longest chain accepted. The bounds tree of an n-node chain holds
/// 2^(n+1)-1 nodes.
pub const MAX_CHAIN_LEN: usize = 20;

pub(crate) fn check_len(len: usize) -> Result<usize> {
    if len <= MAX_CHAIN_LEN {
        Ok(len)
    } else {
        Err(TbnError::ChainTooLong { len, max: MAX_CHAIN_LEN })
    }
}

/// Check that a value lies in the closed unit interval (NaN fails)
pub(crate) fn check_unit(param: Param, index: Option<NodeIndex>, value: F) -> Result<F> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TbnError::OutOfRange { param, index, value })
    }
}
