use crate::diagram::DiagramData;
use csv::Writer;
use std::error::Error;

pub fn render(diagram: &DiagramData) -> Result<String, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);

    // Write the header
    wtr.write_record(["source", "target", "resolved", "value"])?;

    for edge in &diagram.edges {
        let record = edge.to_record();
        wtr.write_record(&[
            record.source,
            record.target,
            record.resolved.to_string(),
            record.value.to_string(),
        ])?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{build_diagram, DiagramOptions};
    use crate::node::InputNode;

    #[test]
    fn test_render_edges() {
        let nodes = vec![
            InputNode::new("A", "X", "red", 0)
                .with_connections(&["B", "C"])
                .with_strength("1.5|-2"),
            InputNode::new("B", "X", "red", 1),
        ];
        let diagram = build_diagram("edges", &nodes, &DiagramOptions::default()).unwrap();
        assert_eq!(
            render(&diagram).unwrap(),
            "source,target,resolved,value\nA,B,true,1.5\nA,C,false,-2\n"
        );
    }
}
