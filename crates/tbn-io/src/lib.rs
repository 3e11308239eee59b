//! Configuration files, JSON reports and the `tbn` command line.

pub mod config;
pub mod report;
pub mod cli;

pub use config::{ChainConfig, NodeConfig, RuleConfig};
pub use report::{AnalysisReport, BoundsRow};
pub use cli::*;
