use tbn_core::*;
use tbn_io::{AnalysisReport, ChainConfig};

fn main() -> anyhow::Result<()> {
    println!("Threshold Chain Demo: Inference and Bounds");

    // Three default nodes, the middle one with a demanding threshold
    let mut config = ChainConfig::uniform(3);
    config.nodes[1].threshold = 0.65;
    config.evidence = 0.8;
    let chain = config.to_chain()?;
    println!("Built chain: {} nodes, thresholds {:?}", chain.len(), chain.thresholds());

    let outputs = chain.infer(config.evidence)?;
    println!("\nForward inference from evidence {:.2}:", config.evidence);
    for o in &outputs {
        println!("  Node {}: {:.3} -> rule {} -> {:.3}", o.index, o.input, o.selection, o.output);
    }

    let tree = BoundsTree::build(&chain, &BoundsConfig::default())
        .ok_or_else(|| anyhow::anyhow!("chain is empty"))?;
    let summary = tree.summary();
    println!(
        "\nBounds tree: {} nodes ({} alive, {} dead)",
        summary.node_count, summary.alive, summary.dead
    );

    println!("\nComplete selection sequences:");
    for leaf in tree.leaves() {
        match leaf.node.interval() {
            Some(iv) => println!("  {}: [{:.3}, {:.3}]", leaf.path_string(), iv.min(), iv.max()),
            None => println!("  {}: unreachable", leaf.path_string()),
        }
    }

    let taken: Vec<Selection> = outputs.iter().map(|o| o.selection).collect();
    if let Some(node) = tree.find(&taken) {
        println!("\nInferred sequence {} is {}", path_string(&taken), if node.is_dead() { "dead" } else { "alive" });
    }

    let report = AnalysisReport::new(chain.len())
        .with_inference(config.evidence, outputs)
        .with_bounds(Some(&tree));
    println!("\nReport {} with {} bounds rows", report.run_id, report.bounds.len());

    Ok(())
}
