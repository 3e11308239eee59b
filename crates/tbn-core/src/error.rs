//! Error types for chain construction and analysis

use crate::{NodeIndex, F};
use std::fmt;
use thiserror::Error;

/// Which supplied quantity failed validation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    Threshold,
    TrueWeight,
    FalseWeight,
    Evidence,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Param::Threshold => "threshold",
            Param::TrueWeight => "true weight",
            Param::FalseWeight => "false weight",
            Param::Evidence => "evidence",
        };
        f.write_str(name)
    }
}

fn at(index: &Option<NodeIndex>) -> String {
    match index {
        Some(i) => format!(" at node {}", i),
        None => String::new(),
    }
}

/// Chain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TbnError {
    #[error("{param}{} must lie in [0, 1], got {value}", at(.index))]
    OutOfRange {
        param: Param,
        index: Option<NodeIndex>,
        value: F,
    },

    #[error("node index {index} out of bounds for chain of length {len}")]
    IndexOutOfBounds { index: NodeIndex, len: usize },

    #[error("chain of length {len} exceeds the maximum of {max} nodes")]
    ChainTooLong { len: usize, max: usize },
}

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, TbnError>;
