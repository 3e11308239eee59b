use serde::{Deserialize, Serialize};
use std::path::Path;
use tbn_core::{Chain, ChainNode, LinearRule, TbnError, DEFAULT_EVIDENCE, F, MAX_CHAIN_LEN};

/// Blend weights of one rule
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub true_weight: F,
    pub false_weight: F,
}

impl From<LinearRule> for RuleConfig {
    fn from(rule: LinearRule) -> Self {
        Self { true_weight: rule.true_weight, false_weight: rule.false_weight }
    }
}

impl From<RuleConfig> for LinearRule {
    fn from(rule: RuleConfig) -> Self {
        LinearRule::new(rule.true_weight, rule.false_weight)
    }
}

fn default_rule_a() -> RuleConfig {
    LinearRule::DEFAULT_A.into()
}

fn default_rule_b() -> RuleConfig {
    LinearRule::DEFAULT_B.into()
}

fn default_threshold() -> F {
    ChainNode::default().threshold()
}

fn default_evidence() -> F {
    DEFAULT_EVIDENCE
}

/// Parameters of one chain node
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_threshold")]
    pub threshold: F,
    #[serde(default = "default_rule_a")]
    pub rule_a: RuleConfig,
    #[serde(default = "default_rule_b")]
    pub rule_b: RuleConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            rule_a: default_rule_a(),
            rule_b: default_rule_b(),
        }
    }
}

/// Chain parameters and evidence, as stored on disk
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_evidence")]
    pub evidence: F,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { evidence: default_evidence(), nodes: Vec::new() }
    }
}

impl ChainConfig {
    /// `n` default nodes
    pub fn uniform(n: usize) -> Self {
        Self { nodes: vec![NodeConfig::default(); n], ..Self::default() }
    }

    /// Change the node count, appending default nodes when growing.
    /// Lengths past `MAX_CHAIN_LEN` are rejected before allocating.
    pub fn resize(&mut self, n: usize) -> tbn_core::Result<()> {
        if n > MAX_CHAIN_LEN {
            return Err(TbnError::ChainTooLong { len: n, max: MAX_CHAIN_LEN });
        }
        self.nodes.resize(n, NodeConfig::default());
        Ok(())
    }

    /// Apply an `INDEX=VALUE` threshold override
    pub fn apply_threshold_override(&mut self, spec: &str) -> anyhow::Result<()> {
        let (index, value) = spec
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("threshold override '{}' is not INDEX=VALUE", spec))?;
        let index: usize = index.trim().parse()?;
        let value: F = value.trim().parse()?;
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("threshold override for node {} but chain has {} nodes", index, len))?;
        node.threshold = value;
        Ok(())
    }

    /// Validated chain; out-of-range parameters are rejected, never clamped
    pub fn to_chain(&self) -> tbn_core::Result<Chain> {
        let params: Vec<(LinearRule, LinearRule, F)> = self
            .nodes
            .iter()
            .map(|n| (n.rule_a.into(), n.rule_b.into(), n.threshold))
            .collect();
        Chain::from_params(&params)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&json)?;
        Ok(config)
    }
}
