use crate::diagram::DiagramData;
use csv::Writer;
use std::error::Error;

/// One row per network: node count and legend color.
pub fn render(diagram: &DiagramData) -> Result<String, Box<dyn Error>> {
    let mut wtr = Writer::from_writer(vec![]);

    wtr.write_record(["network", "count", "color"])?;

    for (network, count) in &diagram.stats.counts {
        wtr.write_record(&[
            network.to_string(),
            count.to_string(),
            diagram
                .stats
                .colors
                .get(network)
                .cloned()
                .unwrap_or_default(),
        ])?;
    }

    let data = wtr.into_inner()?;
    let csv_string = String::from_utf8(data)?;

    Ok(csv_string)
}
