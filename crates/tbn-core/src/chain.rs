use crate::{check_len, check_unit, LinearRule, NodeIndex, Param, Result, Selection, TbnError, F};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// One stage of the chain: picks rule A or B by comparing its input to a threshold
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChainNode {
    rule_a: LinearRule,
    rule_b: LinearRule,
    threshold: F,
}

impl Default for ChainNode {
    fn default() -> Self {
        Self {
            rule_a: LinearRule::DEFAULT_A,
            rule_b: LinearRule::DEFAULT_B,
            threshold: 0.5,
        }
    }
}

impl ChainNode {
    pub fn new(rule_a: LinearRule, rule_b: LinearRule, threshold: F) -> Result<Self> {
        let node = Self { rule_a, rule_b, threshold };
        node.validate(None)?;
        Ok(node)
    }

    /// Default rules with the given threshold
    pub fn with_threshold(threshold: F) -> Result<Self> {
        Self::new(LinearRule::DEFAULT_A, LinearRule::DEFAULT_B, threshold)
    }

    fn validate(&self, index: Option<NodeIndex>) -> Result<()> {
        self.rule_a.validate(index)?;
        self.rule_b.validate(index)?;
        check_unit(Param::Threshold, index, self.threshold)?;
        Ok(())
    }

    pub fn rule_a(&self) -> &LinearRule {
        &self.rule_a
    }

    pub fn rule_b(&self) -> &LinearRule {
        &self.rule_b
    }

    pub fn threshold(&self) -> F {
        self.threshold
    }

    pub fn rule(&self, selection: Selection) -> &LinearRule {
        match selection {
            Selection::A => &self.rule_a,
            Selection::B => &self.rule_b,
        }
    }

    pub fn select(&self, input: F) -> Selection {
        Selection::for_input(input, self.threshold)
    }

    /// Output for a given predecessor output, with the rule that produced it
    pub fn infer_output(&self, input: F) -> (Selection, F) {
        let selection = self.select(input);
        (selection, self.rule(selection).evaluate(input))
    }
}

/// Result of forward inference at one chain position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    pub index: NodeIndex,
    pub input: F,
    pub selection: Selection,
    pub output: F,
}

/// Linear chain of nodes fed by a single evidence value.
///
/// Node `i` reads the output of node `i - 1`; node 0 reads the evidence.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Chain {
    nodes: Vec<ChainNode>,
}

impl Chain {
    pub fn new(nodes: Vec<ChainNode>) -> Result<Self> {
        check_len(nodes.len())?;
        for (i, node) in nodes.iter().enumerate() {
            node.validate(Some(i))?;
        }
        Ok(Self { nodes })
    }

    /// Build from raw (rule A, rule B, threshold) triples, validating each
    pub fn from_params(params: &[(LinearRule, LinearRule, F)]) -> Result<Self> {
        let nodes = params
            .iter()
            .map(|&(rule_a, rule_b, threshold)| ChainNode { rule_a, rule_b, threshold })
            .collect();
        Self::new(nodes)
    }

    /// `n` nodes with default rules and threshold 0.5
    pub fn uniform(n: usize) -> Result<Self> {
        check_len(n)?;
        Ok(Self { nodes: vec![ChainNode::default(); n] })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    pub fn get(&self, index: NodeIndex) -> Option<&ChainNode> {
        self.nodes.get(index)
    }

    pub fn thresholds(&self) -> Vec<F> {
        self.nodes.iter().map(|n| n.threshold).collect()
    }

    pub fn push(&mut self, node: ChainNode) -> Result<()> {
        check_len(self.nodes.len() + 1)?;
        self.nodes.push(node);
        Ok(())
    }

    /// Change the chain length, appending default nodes when growing
    pub fn resize(&mut self, n: usize) -> Result<()> {
        check_len(n)?;
        self.nodes.resize(n, ChainNode::default());
        Ok(())
    }

    fn node_mut(&mut self, index: NodeIndex) -> Result<&mut ChainNode> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(TbnError::IndexOutOfBounds { index, len })
    }

    pub fn set_threshold(&mut self, index: NodeIndex, threshold: F) -> Result<()> {
        check_unit(Param::Threshold, Some(index), threshold)?;
        self.node_mut(index)?.threshold = threshold;
        Ok(())
    }

    pub fn set_rules(&mut self, index: NodeIndex, rule_a: LinearRule, rule_b: LinearRule) -> Result<()> {
        rule_a.validate(Some(index))?;
        rule_b.validate(Some(index))?;
        let node = self.node_mut(index)?;
        node.rule_a = rule_a;
        node.rule_b = rule_b;
        Ok(())
    }

    /// Forward inference: propagate one evidence value down the chain.
    ///
    /// Returns one entry per node; an empty chain yields an empty vector.
    pub fn infer(&self, evidence: F) -> Result<Vec<NodeOutput>> {
        check_unit(Param::Evidence, None, evidence)?;

        let mut outputs = Vec::with_capacity(self.nodes.len());
        let mut input = evidence;
        for (index, node) in self.nodes.iter().enumerate() {
            let (selection, output) = node.infer_output(input);
            trace!("node {}: input {:.4} -> rule {} -> {:.4}", index, input, selection, output);
            outputs.push(NodeOutput { index, input, selection, output });
            input = output;
        }

        debug!("inferred {} node outputs from evidence {:.4}", outputs.len(), evidence);
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_CHAIN_LEN;

    #[test]
    fn test_single_node_tie() {
        let node = ChainNode::new(LinearRule::new(0.7, 0.5), LinearRule::new(0.5, 0.3), 0.5).unwrap();
        let chain = Chain::new(vec![node]).unwrap();
        let out = chain.infer(0.5).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].selection, Selection::B);
        assert!((out[0].output - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_outputs_feed_forward() {
        let chain = Chain::uniform(3).unwrap();
        let out = chain.infer(0.9).unwrap();

        // 0.9 > 0.5 -> A: 0.7*0.9 + 0.5*0.1 = 0.68
        assert_eq!(out[0].selection, Selection::A);
        assert!((out[0].output - 0.68).abs() < 1e-12);
        for w in out.windows(2) {
            assert_eq!(w[1].input, w[0].output);
        }
        assert_eq!(out.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_chain() {
        let chain = Chain::default();
        assert!(chain.infer(0.3).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_evidence() {
        let chain = Chain::uniform(2).unwrap();
        assert!(matches!(
            chain.infer(1.01),
            Err(TbnError::OutOfRange { param: Param::Evidence, .. })
        ));
        assert!(chain.infer(F::NAN).is_err());
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(ChainNode::with_threshold(-0.2).is_err());
        let bad = (LinearRule::new(0.5, 0.5), LinearRule::new(1.5, 0.0), 0.5);
        let err = Chain::from_params(&[(LinearRule::DEFAULT_A, LinearRule::DEFAULT_B, 0.3), bad]).unwrap_err();
        assert_eq!(
            err,
            TbnError::OutOfRange { param: Param::TrueWeight, index: Some(1), value: 1.5 }
        );
    }

    #[test]
    fn test_setters() {
        let mut chain = Chain::uniform(2).unwrap();
        chain.set_threshold(1, 0.8).unwrap();
        assert_eq!(chain.thresholds(), vec![0.5, 0.8]);

        assert!(chain.set_threshold(0, 2.0).is_err());
        assert_eq!(chain.get(0).unwrap().threshold(), 0.5);
        assert_eq!(
            chain.set_threshold(5, 0.1),
            Err(TbnError::IndexOutOfBounds { index: 5, len: 2 })
        );

        chain.set_rules(0, LinearRule::constant(0.2), LinearRule::constant(0.9)).unwrap();
        assert_eq!(*chain.get(0).unwrap().rule(Selection::B), LinearRule::constant(0.9));

        chain.resize(4).unwrap();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain.get(3), Some(&ChainNode::default()));
        chain.resize(1).unwrap();
        assert_eq!(chain.thresholds(), vec![0.5]);
    }

    #[test]
    fn test_rejects_oversized_chain() {
        let too_long = MAX_CHAIN_LEN + 1;
        let expected = TbnError::ChainTooLong { len: too_long, max: MAX_CHAIN_LEN };

        assert_eq!(Chain::uniform(too_long), Err(expected.clone()));
        assert_eq!(Chain::new(vec![ChainNode::default(); too_long]), Err(expected.clone()));
        let params = vec![(LinearRule::DEFAULT_A, LinearRule::DEFAULT_B, 0.5); too_long];
        assert_eq!(Chain::from_params(&params), Err(expected.clone()));

        let mut chain = Chain::uniform(MAX_CHAIN_LEN).unwrap();
        assert_eq!(chain.push(ChainNode::default()), Err(expected));
        assert_eq!(chain.resize(40), Err(TbnError::ChainTooLong { len: 40, max: MAX_CHAIN_LEN }));
        assert_eq!(chain.len(), MAX_CHAIN_LEN);

        chain.resize(2).unwrap();
        chain.push(ChainNode::default()).unwrap();
        assert_eq!(chain.len(), 3);
    }
}
