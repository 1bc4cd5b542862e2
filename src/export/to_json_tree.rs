use crate::diagram::DiagramData;
use std::error::Error;

pub fn render(diagram: &DiagramData) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string_pretty(&diagram.tree.to_json_tree())?)
}
