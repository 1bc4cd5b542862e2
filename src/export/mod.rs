pub mod to_csv_categories;
pub mod to_csv_edges;
pub mod to_dot_hierarchy;
pub mod to_json;
pub mod to_json_tree;

use crate::diagram::DiagramData;
use crate::plan::ExportFileType;
use std::error::Error;

/// Dispatches to the renderer for `exporter`.
pub fn render(diagram: &DiagramData, exporter: ExportFileType) -> Result<String, Box<dyn Error>> {
    match exporter {
        ExportFileType::JSON => to_json::render(diagram),
        ExportFileType::Tree => to_json_tree::render(diagram),
        ExportFileType::CSVEdges => to_csv_edges::render(diagram),
        ExportFileType::CSVCategories => to_csv_categories::render(diagram),
        ExportFileType::DOTHierarchy => to_dot_hierarchy::render(diagram),
    }
}
