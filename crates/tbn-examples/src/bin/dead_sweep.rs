use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tbn_core::*;

/// Fraction of dead complete sequences in random chains, by length
fn main() -> anyhow::Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let trials = 200;
    let config = BoundsConfig::default();

    println!("Dead-sequence sweep ({} random chains per length)", trials);
    println!("{:>6} {:>10} {:>12}", "length", "leaves", "dead frac");

    for n in 1..=10 {
        let mut dead = 0usize;
        let mut total = 0usize;
        for _ in 0..trials {
            let params: Vec<_> = (0..n)
                .map(|_| {
                    (
                        LinearRule::new(rng.gen(), rng.gen()),
                        LinearRule::new(rng.gen(), rng.gen()),
                        rng.gen::<F>(),
                    )
                })
                .collect();
            let tree = BoundsTree::from_params(&params, &config)?
                .ok_or_else(|| anyhow::anyhow!("empty chain"))?;
            let leaves = tree.leaves();
            total += leaves.len();
            dead += leaves.iter().filter(|l| l.node.is_dead()).count();
        }
        println!("{:>6} {:>10} {:>12.4}", n, 1usize << n, dead as F / total as F);
    }

    Ok(())
}
