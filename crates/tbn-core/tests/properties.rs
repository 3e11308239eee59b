use proptest::prelude::*;
use tbn_core::{path_string, tree_node_count, BoundsConfig, BoundsNode, BoundsTree, Chain, LinearRule, F};

fn rule() -> impl Strategy<Value = LinearRule> {
    (0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(t, f)| LinearRule::new(t, f))
}

fn chain(max_len: usize) -> impl Strategy<Value = Chain> {
    prop::collection::vec((rule(), rule(), 0.0..=1.0f64), 1..=max_len)
        .prop_map(|params| Chain::from_params(&params).unwrap())
}

fn all_dead(node: &BoundsNode) -> bool {
    node.is_dead() && node.left().map_or(true, all_dead) && node.right().map_or(true, all_dead)
}

proptest! {
    #[test]
    fn prop_rule_output_bounded(r in rule(), x in 0.0..=1.0f64) {
        let y = r.evaluate(x);
        prop_assert!((0.0..=1.0).contains(&y));
        let (lo, hi) = r.range();
        prop_assert!(lo - 1e-12 <= y && y <= hi + 1e-12);
    }

    #[test]
    fn prop_node_count(c in chain(7)) {
        let tree = BoundsTree::build(&c, &BoundsConfig::default()).unwrap();
        prop_assert_eq!(Some(tree.node_count()), tree_node_count(c.len()));
        prop_assert_eq!(Some(tree.summary().node_count), tree_node_count(c.len()));
    }

    #[test]
    fn prop_dead_subtrees_stay_dead(c in chain(7)) {
        let tree = BoundsTree::build(&c, &BoundsConfig::sequential()).unwrap();
        for entry in tree.level_order() {
            if entry.node.is_dead() {
                prop_assert!(all_dead(entry.node), "alive node under dead {}", entry.path_string());
            }
        }
    }

    #[test]
    fn prop_alive_intervals_ordered_and_bounded(c in chain(7)) {
        let tree = BoundsTree::build(&c, &BoundsConfig::default()).unwrap();
        for entry in tree.level_order() {
            if let Some(iv) = entry.node.interval() {
                prop_assert!(iv.min() <= iv.max());
                prop_assert!(0.0 <= iv.min() && iv.max() <= 1.0);
            }
        }
    }

    #[test]
    fn prop_build_is_idempotent(c in chain(6)) {
        let first = BoundsTree::build(&c, &BoundsConfig::default()).unwrap();
        let second = BoundsTree::build(&c, &BoundsConfig::default()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_infer_is_pure(c in chain(8), evidence in 0.0..=1.0f64) {
        prop_assert_eq!(c.infer(evidence).unwrap(), c.infer(evidence).unwrap());
    }

    /// The path taken by forward inference is alive in the bounds tree and
    /// every output lies in its node's interval.
    #[test]
    fn prop_inference_lies_within_bounds(c in chain(7), evidence in 0.0..=1.0f64) {
        let tree = BoundsTree::build(&c, &BoundsConfig::default()).unwrap();
        let outputs = c.infer(evidence).unwrap();
        let path: Vec<_> = outputs.iter().map(|o| o.selection).collect();

        for (i, out) in outputs.iter().enumerate() {
            let node = tree.find(&path[..=i]).unwrap();
            let iv = node.interval();
            prop_assert!(iv.is_some(), "inferred path {} is dead", path_string(&path[..=i]));
            let tol: F = 1e-9;
            prop_assert!(iv.unwrap().contains_within(out.output, tol));
        }
    }
}
