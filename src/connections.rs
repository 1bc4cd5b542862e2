use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::node::{InputNode, Weight};
use crate::validation::{Diagnostic, DiagnosticKind};

/// A directed, weighted link between two input nodes.
///
/// `target` is `None` when the referenced name is not part of the input;
/// `reference` always holds the name as written in `connections`.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge<'a> {
    pub source: &'a InputNode,
    pub target: Option<&'a InputNode>,
    pub reference: &'a str,
    pub value: f64,
}

impl Edge<'_> {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub fn to_record(&self) -> EdgeRecord {
        EdgeRecord {
            source: self.source.name.clone(),
            target: self.reference.to_string(),
            resolved: self.is_resolved(),
            value: self.value,
        }
    }
}

/// Owned form of an [`Edge`], used by the exporters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub resolved: bool,
    pub value: f64,
}

/// Resolves every `connections` entry into an [`Edge`].
pub fn resolve(nodes: &[InputNode]) -> Vec<Edge<'_>> {
    resolve_reporting(nodes).0
}

/// Same as [`resolve`], also returning the weight and reference problems
/// encountered on the way. Problems never abort resolution: unresolved
/// targets stay `None` and missing or unparseable weights become `0`.
pub fn resolve_reporting(nodes: &[InputNode]) -> (Vec<Edge<'_>>, Vec<Diagnostic>) {
    // Last write wins on duplicate names
    let map: HashMap<&str, &InputNode> = nodes.iter().map(|n| (n.name.as_str(), n)).collect();

    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();

    for node in nodes {
        let connections = node.connections();
        let mut weights: Option<VecDeque<f64>> = node.weights().map(|weights| {
            weights
                .into_iter()
                .map(|w| match w {
                    Weight::Value(value) => value,
                    Weight::Malformed(segment) => {
                        diagnostics.push(Diagnostic::error(
                            DiagnosticKind::MalformedWeights,
                            &node.name,
                            format!("strength segment {:?} is not a number", segment),
                        ));
                        0.0
                    }
                })
                .collect()
        });

        if let Some(queue) = &weights {
            if queue.len() != connections.len() {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::MalformedWeights,
                    &node.name,
                    format!(
                        "strength has {} weight(s) for {} connection(s)",
                        queue.len(),
                        connections.len()
                    ),
                ));
            }
        }

        for reference in connections {
            let value = match weights.as_mut() {
                Some(queue) => queue.pop_front().unwrap_or(0.0),
                None => 0.0,
            };

            let target = map.get(reference.as_str()).copied();
            if target.is_none() {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::DanglingReference,
                    &node.name,
                    format!("connection target {:?} is not in the input", reference),
                ));
            }

            edges.push(Edge {
                source: node,
                target,
                reference: reference.as_str(),
                value,
            });
        }
    }

    debug!(
        "Resolved {} edges from {} nodes ({} issue(s))",
        edges.len(),
        nodes.len(),
        diagnostics.len()
    );

    (edges, diagnostics)
}
