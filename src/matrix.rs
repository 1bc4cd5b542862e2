//! Connectivity matrix to node list conversion.
//!
//! A square matrix of region-to-region correlations is thresholded so only
//! the strongest positive and negative links survive, and every row becomes
//! one [`InputNode`] whose `connections`/`strength` encode the kept cells.

use csv::ReaderBuilder;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use tracing::{debug, info};

use crate::errors::{ConnectogramError, ConnectogramResult};
use crate::node::{InputNode, NetworkId};
use crate::palette;

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectivityMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl ConnectivityMatrix {
    pub fn new(labels: Vec<String>, values: Vec<Vec<f64>>) -> ConnectogramResult<Self> {
        let matrix = Self { labels, values };
        matrix.verify_square()?;
        Ok(matrix)
    }

    /// Reads a delimited matrix with a header row of column labels and no
    /// index column. Empty and `NaN` cells read as zero.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> ConnectogramResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let labels: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut values = Vec::with_capacity(labels.len());
        for (row_idx, record) in rdr.records().enumerate() {
            let record = record?;
            let row = record
                .iter()
                .enumerate()
                .map(|(col_idx, cell)| parse_cell(cell, row_idx, col_idx))
                .collect::<ConnectogramResult<Vec<f64>>>()?;
            values.push(row);
        }

        Self::new(labels, values)
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    fn verify_square(&self) -> ConnectogramResult<()> {
        let n = self.labels.len();
        if self.values.len() != n {
            return Err(ConnectogramError::InvalidMatrix(format!(
                "matrix is size [{},{}], expected a square matrix",
                self.values.len(),
                n
            )));
        }
        if let Some((idx, row)) = self.values.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(ConnectogramError::InvalidMatrix(format!(
                "row {} has {} values, expected {}",
                idx,
                row.len(),
                n
            )));
        }
        Ok(())
    }

    /// Keeps positive cells at or above the `threshold` quantile of positive
    /// values and negative cells whose magnitude is at or above the same
    /// quantile of negative magnitudes. Everything else becomes zero.
    pub fn threshold(&self, threshold: f64) -> ConnectogramResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConnectogramError::InvalidMatrix(format!(
                "threshold {} is outside [0, 1]",
                threshold
            )));
        }

        let cells = || self.values.iter().flatten().copied();
        let q = threshold * 100.0;
        let qpos = percentile(cells().map(|v| v.max(0.0)).collect(), q);
        let qneg = percentile(cells().map(|v| (-v).max(0.0)).collect(), q);
        debug!("Threshold {}: positive cut {}, negative cut {}", threshold, qpos, qneg);

        let values = self
            .values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| {
                        if (v > 0.0 && v >= qpos) || (v < 0.0 && -v >= qneg) {
                            v
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            labels: self.labels.clone(),
            values,
        })
    }
}

fn parse_cell(cell: &str, row: usize, col: usize) -> ConnectogramResult<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(0.0);
    }
    cell.parse::<f64>().map_err(|_| {
        ConnectogramError::InvalidMatrix(format!(
            "cell [{},{}] is not a number: {:?}",
            row, col, cell
        ))
    })
}

/// `q`-th percentile (0..=100) with linear interpolation between the two
/// closest ranks. Returns 0 for an empty sample.
pub fn percentile(mut values: Vec<f64>, q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = (q / 100.0).clamp(0.0, 1.0) * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    values[lower] + (values[upper] - values[lower]) * fraction
}

/// Row metadata: the hierarchy group each row belongs to and, optionally,
/// the network used for coloring (defaults to the group).
#[derive(Clone, Debug, Default)]
pub struct MatrixLayout {
    pub groups: Vec<String>,
    pub networks: Option<Vec<String>>,
}

/// Converts a thresholded matrix into connectogram nodes.
pub fn matrix_to_nodes(
    matrix: &ConnectivityMatrix,
    layout: &MatrixLayout,
    threshold: f64,
) -> ConnectogramResult<Vec<InputNode>> {
    let n = matrix.size();
    if layout.groups.len() != n {
        return Err(ConnectogramError::InvalidMatrix(format!(
            "{} groups supplied for a {}x{} matrix",
            layout.groups.len(),
            n,
            n
        )));
    }
    let networks = layout.networks.as_ref().unwrap_or(&layout.groups);
    if networks.len() != n {
        return Err(ConnectogramError::InvalidMatrix(format!(
            "{} network names supplied for a {}x{} matrix",
            networks.len(),
            n,
            n
        )));
    }

    let thresholded = matrix.threshold(threshold)?;

    let unique: BTreeSet<&str> = networks.iter().map(|s| s.as_str()).collect();
    let network_colors: HashMap<&str, String> = unique
        .iter()
        .copied()
        .zip(palette::colors(unique.len()))
        .collect();

    let names: Vec<String> = layout
        .groups
        .iter()
        .zip(&matrix.labels)
        .map(|(group, label)| format!("{}.{}", group, label))
        .collect();

    let nodes: Vec<InputNode> = thresholded
        .values
        .iter()
        .enumerate()
        .map(|(c, row)| {
            let kept: Vec<(usize, f64)> = row
                .iter()
                .enumerate()
                .filter(|(_, &v)| v != 0.0)
                .map(|(j, &v)| (j, v))
                .collect();

            let network = networks[c].as_str();
            let mut node = InputNode::new(
                &names[c],
                NetworkId::from(network),
                &network_colors[network],
                matrix.labels[c].trim().parse::<i64>().unwrap_or(c as i64),
            );
            if !kept.is_empty() {
                node.connections = Some(kept.iter().map(|&(j, _)| names[j].clone()).collect());
                node.strength = Some(
                    kept.iter()
                        .map(|&(_, v)| v.to_string())
                        .collect::<Vec<_>>()
                        .join("|"),
                );
            }
            node
        })
        .collect();

    info!(
        "Converted {}x{} matrix into {} nodes with {} connections",
        n,
        n,
        nodes.len(),
        nodes.iter().map(|n| n.connections().len()).sum::<usize>()
    );

    Ok(nodes)
}
