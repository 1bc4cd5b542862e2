use crate::connections::EdgeRecord;
use crate::diagram::DiagramData;
use std::error::Error;

/// Full bundle: tree, resolved edges, category statistics and the issues
/// found while validating the input.
pub fn render(diagram: &DiagramData) -> Result<String, Box<dyn Error>> {
    use serde_json::json;

    let edges: Vec<EdgeRecord> = diagram.edges.iter().map(|e| e.to_record()).collect();

    let res = json!({
        "name": diagram.name,
        "tree": diagram.tree.to_json_tree(),
        "edges": edges,
        "classcount": diagram.stats,
        "diagnostics": diagram.report.diagnostics,
    });
    Ok(serde_json::to_string_pretty(&res)?)
}
