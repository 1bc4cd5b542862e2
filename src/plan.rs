use serde::{Deserialize, Serialize};

use crate::diagram::DiagramOptions;

/// ## Structure
/// This module contains the data structures for the plan file.
///
/// ```text
/// Plan
///   ├── meta: Option<Meta>
///   │   └── name: Option<String>
///   ├── import: ImportConfig
///   │   └── profiles: Vec<ImportProfile>
///   │       ├── filename: String
///   │       ├── filetype: ImportFileType
///   │       │   ├── Nodes
///   │       │   └── Matrix
///   │       └── matrix: Option<MatrixImportParams>
///   │           ├── parcels: String
///   │           └── threshold: f64
///   ├── options: DiagramOptions
///   │   ├── validation: ValidationMode
///   │   ├── centroids: Option<Vec<i64>>
///   │   └── sort_by_order: bool
///   └── export: ExportProfile
///       └── profiles: Vec<ExportProfileItem>
///           ├── filename: String
///           └── exporter: ExportFileType
///               ├── JSON
///               ├── Tree
///               ├── CSVEdges
///               ├── CSVCategories
///               └── DOTHierarchy
/// ```

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Meta {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Plan {
    pub meta: Option<Meta>,
    pub import: ImportConfig,
    #[serde(default)]
    pub options: DiagramOptions,
    pub export: ExportProfile,
}

//
// Import configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ImportConfig {
    pub profiles: Vec<ImportProfile>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ImportFileType {
    Nodes,
    Matrix,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ImportProfile {
    pub filename: String,
    pub filetype: ImportFileType,
    pub matrix: Option<MatrixImportParams>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MatrixImportParams {
    /// Parcel table supplying group and network per matrix row
    pub parcels: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.99
}

//
// Export configuration
//

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ExportProfile {
    pub profiles: Vec<ExportProfileItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFileType {
    JSON,
    Tree,
    CSVEdges,
    CSVCategories,
    DOTHierarchy,
}

impl Plan {
    pub fn name(&self) -> String {
        self.meta
            .as_ref()
            .and_then(|m| m.name.clone())
            .unwrap_or_else(|| "Unnamed Connectogram".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationMode;

    #[test]
    fn test_serialization() {
        let config = ImportConfig {
            profiles: vec![ImportProfile {
                filetype: ImportFileType::Nodes,
                filename: "nodes.json".to_string(),
                matrix: None,
            }],
        };

        let yaml_str = serde_yaml::to_string(&config).unwrap();
        assert!(yaml_str.contains("profiles"));
        assert!(yaml_str.contains("Nodes"));
    }

    #[test]
    fn test_planfile_deserialization() {
        let yaml_str = r#"
meta:
  name: Parcel connectogram
import:
  profiles:
    - filename: parcel_matrix.tsv
      filetype: Matrix
      matrix:
        parcels: parcels.csv
options:
  validation: Strict
  centroids: [3, 17]
export:
  profiles:
    - filename: connectogram.json
      exporter: JSON
    - filename: edges.csv
      exporter: CSVEdges
    - filename: hierarchy.dot
      exporter: DOTHierarchy
"#;

        let plan: Plan = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(plan.name(), "Parcel connectogram");
        assert_eq!(plan.import.profiles[0].filetype, ImportFileType::Matrix);
        let matrix = plan.import.profiles[0].matrix.as_ref().unwrap();
        assert_eq!(matrix.parcels, "parcels.csv");
        assert_eq!(matrix.threshold, 0.99);
        assert_eq!(plan.options.validation, ValidationMode::Strict);
        assert_eq!(plan.options.centroids, Some(vec![3, 17]));
        assert!(!plan.options.sort_by_order);
        assert_eq!(plan.export.profiles.len(), 3);
        assert_eq!(plan.export.profiles[2].exporter, ExportFileType::DOTHierarchy);
    }

    #[test]
    fn test_options_default_when_missing() {
        let yaml_str = r#"
import:
  profiles:
    - filename: nodes.json
      filetype: Nodes
export:
  profiles: []
"#;
        let plan: Plan = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(plan.options.validation, ValidationMode::Lenient);
        assert!(plan.options.centroids.is_none());
        assert_eq!(plan.name(), "Unnamed Connectogram");
    }
}
