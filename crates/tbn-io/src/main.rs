use clap::Parser;
use log::{info, LevelFilter};
use tbn_io::cli::{run_analyze_command, run_bounds_command, run_infer_command, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::builder().filter_level(LevelFilter::Info).init();
        info!("Verbose output enabled (ignoring RUST_LOG environment variable)");
    } else {
        env_logger::init();
    }

    match cli.command {
        Commands::Infer { chain } => {
            run_infer_command(&chain)?;
        }
        Commands::Bounds { chain, parallel } => {
            run_bounds_command(&chain, parallel)?;
        }
        Commands::Analyze { chain, parallel } => {
            run_analyze_command(&chain, parallel)?;
        }
    }

    Ok(())
}
