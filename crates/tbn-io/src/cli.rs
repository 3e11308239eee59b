use crate::{AnalysisReport, ChainConfig};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use tbn_core::{BoundsConfig, BoundsTree, Chain, F};

#[derive(Parser)]
#[command(name = "tbn")]
#[command(about = "Threshold chain analysis: forward inference and reachable output bounds")]
pub struct Cli {
    /// Log at info level regardless of RUST_LOG
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Chain parameters shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct ChainArgs {
    /// Chain configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Chain length; grows with default nodes or truncates the configured chain
    #[arg(long)]
    pub nodes: Option<usize>,

    /// Evidence fed into the first node
    #[arg(long)]
    pub evidence: Option<F>,

    /// Threshold override, INDEX=VALUE (repeatable)
    #[arg(long = "threshold", value_name = "INDEX=VALUE")]
    pub thresholds: Vec<String>,

    /// Write the JSON report here instead of printing a summary only
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Propagate the evidence value through the chain
    Infer {
        #[command(flatten)]
        chain: ChainArgs,
    },
    /// Build the bounds tree over every rule-selection sequence
    Bounds {
        #[command(flatten)]
        chain: ChainArgs,

        /// Build sibling subtrees in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Inference and bounds together
    Analyze {
        #[command(flatten)]
        chain: ChainArgs,

        /// Build sibling subtrees in parallel
        #[arg(long)]
        parallel: bool,
    },
}

impl ChainArgs {
    /// Resolve the configuration file and command-line overrides
    pub fn resolve(&self) -> anyhow::Result<ChainConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("loading chain configuration from {:?}", path);
                ChainConfig::load_from_file(path)?
            }
            None => ChainConfig::default(),
        };
        if let Some(n) = self.nodes {
            config.resize(n)?;
        }
        if let Some(e) = self.evidence {
            config.evidence = e;
        }
        for spec in &self.thresholds {
            config.apply_threshold_override(spec)?;
        }
        Ok(config)
    }
}

fn bounds_config(parallel: bool) -> BoundsConfig {
    BoundsConfig {
        use_parallel: parallel,
        ..BoundsConfig::default()
    }
}

fn finish(report: &AnalysisReport, out: Option<&PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = out {
        report.save_to_file(path)?;
        println!("Report written to {:?}", path);
    }
    Ok(())
}

fn print_inference(report: &AnalysisReport) {
    println!("\nForward inference (evidence {:.3}):", report.evidence.unwrap_or_default());
    for o in &report.inference {
        println!("  Node {}: input {:.3} -> rule {} -> {:.3}", o.index, o.input, o.selection, o.output);
    }
}

fn print_bounds(report: &AnalysisReport) {
    let Some(summary) = &report.summary else {
        println!("\nEmpty chain: no bounds tree");
        return;
    };
    println!(
        "\nBounds tree: {} nodes ({} alive, {} dead)",
        summary.node_count, summary.alive, summary.dead
    );
    for row in &report.bounds {
        match (row.min, row.max) {
            (Some(min), Some(max)) => println!("  {:>3} {:<12} [{:.3}, {:.3}]", row.index, row.path, min, max),
            _ => println!("  {:>3} {:<12} dead", row.index, row.path),
        }
    }
}

fn load(args: &ChainArgs) -> anyhow::Result<(ChainConfig, Chain)> {
    let config = args.resolve()?;
    let chain = config.to_chain()?;
    println!("Chain: {} nodes, thresholds {:?}", chain.len(), chain.thresholds());
    Ok((config, chain))
}

pub fn run_infer_command(args: &ChainArgs) -> anyhow::Result<AnalysisReport> {
    let (config, chain) = load(args)?;
    let outputs = chain.infer(config.evidence)?;
    let report = AnalysisReport::new(chain.len()).with_inference(config.evidence, outputs);

    print_inference(&report);
    finish(&report, args.out.as_ref())?;
    Ok(report)
}

pub fn run_bounds_command(args: &ChainArgs, parallel: bool) -> anyhow::Result<AnalysisReport> {
    let (_, chain) = load(args)?;
    let tree = BoundsTree::build(&chain, &bounds_config(parallel));
    let report = AnalysisReport::new(chain.len()).with_bounds(tree.as_ref());

    print_bounds(&report);
    finish(&report, args.out.as_ref())?;
    Ok(report)
}

pub fn run_analyze_command(args: &ChainArgs, parallel: bool) -> anyhow::Result<AnalysisReport> {
    let (config, chain) = load(args)?;
    // Validate evidence before paying for the tree
    let outputs = chain.infer(config.evidence)?;
    let tree = BoundsTree::build(&chain, &bounds_config(parallel));
    let report = AnalysisReport::new(chain.len())
        .with_inference(config.evidence, outputs)
        .with_bounds(tree.as_ref());

    print_inference(&report);
    print_bounds(&report);
    finish(&report, args.out.as_ref())?;
    Ok(report)
}
