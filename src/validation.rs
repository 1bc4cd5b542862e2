//! Input validation for connectogram node lists.
//!
//! The core transformations never fail on bad data; they degrade instead.
//! This module makes the degradations visible. Every detected problem is a
//! [`Diagnostic`] of one of three kinds:
//!
//! - **MalformedWeights**: `strength` does not line up with `connections`
//!   (length mismatch or an unparseable segment)
//! - **DanglingReference**: a connection or a hierarchy path names a node
//!   that is not in the input
//! - **DuplicateName**: two nodes share a `name`
//!
//! In [`ValidationMode::Lenient`] diagnostics are only logged. In
//! [`ValidationMode::Strict`] any error-severity diagnostic turns into a
//! [`ConnectogramError::Validation`].

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

use crate::connections;
use crate::errors::{ConnectogramError, ConnectogramResult};
use crate::node::{split_name, InputNode};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    MalformedWeights,
    DanglingReference,
    DuplicateName,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    #[default]
    Lenient,
    Strict,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Name of the node the problem was found on.
    pub node: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, node: &str, message: String) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            node: node.to_string(),
            message,
        }
    }

    pub fn warning(kind: DiagnosticKind, node: &str, message: String) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            node: node.to_string(),
            message,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:?} {:?} on node [{}]: {}",
            self.severity, self.kind, self.node, self.message
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    pub fn log(&self) {
        if self.is_clean() {
            debug!("Node list validated : ok");
            return;
        }
        warn!(
            "Identified {} validation issue(s) ({} error(s))",
            self.diagnostics.len(),
            self.errors().count()
        );
        self.diagnostics.iter().for_each(|d| warn!("{}", d));
    }

    /// Applies the validation mode: strict mode rejects any error-severity
    /// diagnostic, lenient mode passes the report through.
    pub fn enforce(self, mode: ValidationMode) -> ConnectogramResult<Self> {
        match mode {
            ValidationMode::Strict if self.has_errors() => Err(ConnectogramError::Validation(
                self.errors().cloned().collect(),
            )),
            _ => Ok(self),
        }
    }
}

/// Checks a node list for every problem in the taxonomy.
pub fn validate(nodes: &[InputNode]) -> ValidationReport {
    let mut diagnostics = Vec::new();

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for node in nodes {
        let count = seen.entry(node.name.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            diagnostics.push(Diagnostic::error(
                DiagnosticKind::DuplicateName,
                &node.name,
                format!("name {:?} is used by more than one node", node.name),
            ));
        }
    }

    let (_, edge_diagnostics) = connections::resolve_reporting(nodes);
    diagnostics.extend(edge_diagnostics);

    let names: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    let mut reported: HashSet<&str> = HashSet::new();
    for node in nodes {
        let (mut parent, _) = split_name(&node.name);
        while !parent.is_empty() {
            if !names.contains(parent) && reported.insert(parent) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::DanglingReference,
                    &node.name,
                    format!("ancestor {:?} is not in the input, synthesizing it", parent),
                ));
            }
            parent = split_name(parent).0;
        }
    }

    ValidationReport { diagnostics }
}
