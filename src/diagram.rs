use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::categories::{self, CategoryStats};
use crate::connections::{self, Edge};
use crate::errors::ConnectogramResult;
use crate::hierarchy::{self, Hierarchy};
use crate::node::InputNode;
use crate::validation::{self, ValidationMode, ValidationReport};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DiagramOptions {
    #[serde(default)]
    pub validation: ValidationMode,
    /// Centroid keys for `makelabel`; the aggregated centroids when `None`
    #[serde(default)]
    pub centroids: Option<Vec<i64>>,
    /// Sort by `order` before aggregating categories
    #[serde(default)]
    pub sort_by_order: bool,
}

/// Everything a renderer needs for one connectogram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramData<'a> {
    pub name: String,
    pub tree: Hierarchy,
    pub edges: Vec<Edge<'a>>,
    pub stats: CategoryStats,
    pub report: ValidationReport,
}

impl DiagramData<'_> {
    pub fn stats_line(&self) -> String {
        format!(
            "Tree nodes: {}, Edges: {}, Networks: {}, Issues: {}",
            self.tree.len(),
            self.edges.len(),
            self.stats.counts.len(),
            self.report.diagnostics.len()
        )
    }
}

/// Runs validation, category aggregation, hierarchy reconstruction and edge
/// resolution over `nodes`.
pub fn build_diagram<'a>(
    name: &str,
    nodes: &'a [InputNode],
    options: &DiagramOptions,
) -> ConnectogramResult<DiagramData<'a>> {
    let report = validation::validate(nodes);
    report.log();
    let report = report.enforce(options.validation)?;

    let stats = if options.sort_by_order {
        categories::aggregate(categories::sorted_by_order(nodes).iter().copied())
    } else {
        categories::aggregate(nodes)
    };

    let centroid_keys: HashSet<i64> = options
        .centroids
        .as_ref()
        .unwrap_or(&stats.centroids)
        .iter()
        .copied()
        .collect();

    let tree = hierarchy::build(nodes, &centroid_keys);
    let edges = connections::resolve(nodes);

    let diagram = DiagramData {
        name: name.to_string(),
        tree,
        edges,
        stats,
        report,
    };
    info!("Built diagram {:?}: {}", diagram.name, diagram.stats_line());

    Ok(diagram)
}
