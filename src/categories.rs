use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::node::{InputNode, NetworkId};

/// Per-category aggregates for legends and label placement.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CategoryStats {
    /// Node count per network, in first-seen order.
    #[serde(rename = "classes")]
    pub counts: IndexMap<NetworkId, usize>,
    /// Color of the first node seen for each network.
    pub colors: IndexMap<NetworkId, String>,
    /// One display position per contiguous run of a network.
    pub centroids: Vec<i64>,
}

impl CategoryStats {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.centroids.is_empty()
    }

    pub fn count(&self, network: &NetworkId) -> usize {
        self.counts.get(network).copied().unwrap_or(0)
    }
}

/// Aggregates counts, colors and centroids.
///
/// `nodes` must already be in `order` order; see [`sorted_by_order`]. A
/// network whose rows are not contiguous yields one centroid per run.
pub fn aggregate<'a, I>(nodes: I) -> CategoryStats
where
    I: IntoIterator<Item = &'a InputNode>,
    I::IntoIter: Clone,
{
    let nodes = nodes.into_iter();
    let mut stats = CategoryStats::default();

    for node in nodes.clone() {
        *stats.counts.entry(node.network.clone()).or_insert(0) += 1;
        if let Some(color) = stats.colors.get(&node.network) {
            if *color != node.color {
                debug!(
                    "Ignoring color {} on node {}, network {} already uses {}",
                    node.color, node.name, node.network, color
                );
            }
        } else {
            stats
                .colors
                .insert(node.network.clone(), node.color.clone());
        }
    }

    let mut current: Option<&NetworkId> = None;
    for node in nodes {
        if current != Some(&node.network) {
            let count = stats.count(&node.network) as i64;
            stats.centroids.push(node.order + count / 2);
            current = Some(&node.network);
        }
    }

    debug!(
        "Aggregated {} networks with {} centroids",
        stats.counts.len(),
        stats.centroids.len()
    );

    stats
}

/// Stable sort of `nodes` by their `order` field.
pub fn sorted_by_order(nodes: &[InputNode]) -> Vec<&InputNode> {
    let mut sorted: Vec<&InputNode> = nodes.iter().collect();
    sorted.sort_by_key(|n| n.order);
    sorted
}
