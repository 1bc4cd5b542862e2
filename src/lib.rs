pub mod categories;
pub mod common;
pub mod connections;
pub mod data_loader;
pub mod diagram;
pub mod errors;
pub mod export;
pub mod generate_commands;
pub mod hierarchy;
pub mod matrix;
pub mod node;
pub mod palette;
pub mod plan;
pub mod plan_execution;
pub mod validation;

pub use categories::CategoryStats;
pub use connections::Edge;
pub use diagram::{build_diagram, DiagramData, DiagramOptions};
pub use errors::{ConnectogramError, ConnectogramResult};
pub use hierarchy::{Hierarchy, TreeNode, TreeNodeId};
pub use node::{InputNode, NetworkId};
pub use validation::{Diagnostic, DiagnosticKind, Severity, ValidationMode, ValidationReport};
