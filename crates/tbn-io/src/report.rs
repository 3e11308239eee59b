use serde::Serialize;
use std::path::Path;
use tbn_core::{BoundsSummary, BoundsTree, NodeOutput, F};
use uuid::Uuid;

/// One bounds-tree node, flattened for output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoundsRow {
    pub index: usize,
    pub depth: usize,
    pub position: usize,
    pub path: String, // e.g. "ABA"
    pub dead: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<F>,
}

impl BoundsRow {
    pub fn rows(tree: &BoundsTree) -> Vec<BoundsRow> {
        tree.level_order()
            .into_iter()
            .map(|e| BoundsRow {
                index: e.index,
                depth: e.depth,
                position: e.position,
                path: e.path_string(),
                dead: e.node.is_dead(),
                min: e.node.interval().map(|iv| iv.min()),
                max: e.node.interval().map(|iv| iv.max()),
            })
            .collect()
    }
}

/// Result of one analysis run
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub run_id: String,
    pub generated_at: String,
    pub chain_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<F>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inference: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<BoundsRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BoundsSummary>,
}

impl AnalysisReport {
    pub fn new(chain_len: usize) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            chain_len,
            evidence: None,
            inference: Vec::new(),
            bounds: Vec::new(),
            summary: None,
        }
    }

    pub fn with_inference(mut self, evidence: F, outputs: Vec<NodeOutput>) -> Self {
        self.evidence = Some(evidence);
        self.inference = outputs;
        self
    }

    /// Attach a bounds tree; `None` (empty chain) leaves the report without bounds
    pub fn with_bounds(mut self, tree: Option<&BoundsTree>) -> Self {
        if let Some(tree) = tree {
            self.bounds = BoundsRow::rows(tree);
            self.summary = Some(tree.summary());
        }
        self
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
