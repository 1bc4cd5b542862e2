use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, error};

use crate::errors::{ConnectogramError, ConnectogramResult};
use crate::matrix::{ConnectivityMatrix, MatrixLayout};
use crate::node::{InputNode, NetworkId};

fn extension(path: &Path) -> &str {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
}

/// Loads node records from a `.json` array or a `.csv` table.
pub fn load_nodes(path: &Path) -> ConnectogramResult<Vec<InputNode>> {
    let file = File::open(path)?;
    let nodes = match extension(path) {
        "json" => read_nodes_json(file)?,
        "csv" => read_nodes_csv(file)?,
        ext => {
            error!("Error: unsupported node file extension {}", ext);
            return Err(ConnectogramError::InvalidInput(format!(
                "unsupported node file extension {:?}",
                ext
            )));
        }
    };
    debug!("Loaded {} nodes from {}", nodes.len(), path.display());
    Ok(nodes)
}

pub fn read_nodes_json<R: Read>(reader: R) -> ConnectogramResult<Vec<InputNode>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Flat CSV form of a node; `connections` is `|`-separated like
/// `strength`.
#[derive(Deserialize, Debug)]
struct NodeRecord {
    name: String,
    network: String,
    color: String,
    order: i64,
    #[serde(default)]
    connections: Option<String>,
    #[serde(default)]
    strength: Option<String>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    z: Option<f64>,
}

impl From<NodeRecord> for InputNode {
    fn from(record: NodeRecord) -> Self {
        let connections = record
            .connections
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.split('|').map(|s| s.trim().to_string()).collect());
        InputNode {
            name: record.name,
            network: NetworkId::from(record.network),
            color: record.color,
            order: record.order,
            connections,
            strength: record.strength.filter(|s| !s.is_empty()),
            x: record.x,
            y: record.y,
            z: record.z,
            image: None,
        }
    }
}

pub fn read_nodes_csv<R: Read>(reader: R) -> ConnectogramResult<Vec<InputNode>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut nodes = Vec::new();
    for record in rdr.deserialize::<NodeRecord>() {
        nodes.push(record?.into());
    }
    Ok(nodes)
}

/// Field separator for a delimited file, chosen by extension.
pub fn separator_for(path: &Path) -> ConnectogramResult<u8> {
    match extension(path) {
        "csv" => Ok(b','),
        "tsv" | "txt" => Ok(b'\t'),
        ext => {
            error!("Error: unsupported extension {}", ext);
            Err(ConnectogramError::InvalidInput(format!(
                "unsupported matrix file extension {:?}",
                ext
            )))
        }
    }
}

pub fn load_matrix(path: &Path) -> ConnectogramResult<ConnectivityMatrix> {
    let separator = separator_for(path)?;
    let matrix = ConnectivityMatrix::from_reader(File::open(path)?, separator)?;
    debug!(
        "Loaded {}x{} matrix from {}",
        matrix.size(),
        matrix.size(),
        path.display()
    );
    Ok(matrix)
}

/// One parcel of a brain atlas.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Parcel {
    #[serde(rename = "Hem")]
    pub hemisphere: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Community")]
    pub community: String,
}

impl Parcel {
    /// Hierarchy group of the parcel, e.g. `L-1`.
    pub fn group(&self) -> String {
        format!("{}-{}", self.hemisphere, self.id)
    }
}

pub fn read_parcels<R: Read>(reader: R) -> ConnectogramResult<Vec<Parcel>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut parcels = Vec::new();
    for record in rdr.deserialize::<Parcel>() {
        parcels.push(record?);
    }
    Ok(parcels)
}

pub fn load_parcels(path: &Path) -> ConnectogramResult<Vec<Parcel>> {
    let parcels = read_parcels(File::open(path)?)?;
    debug!("Loaded {} parcels from {}", parcels.len(), path.display());
    Ok(parcels)
}

/// Groups come from hemisphere and parcel id, networks from the community.
pub fn layout_from_parcels(parcels: &[Parcel]) -> MatrixLayout {
    MatrixLayout {
        groups: parcels.iter().map(Parcel::group).collect(),
        networks: Some(parcels.iter().map(|p| p.community.clone()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_nodes_json() {
        let json = r##"[
            {"name":"L-1.1","order":1,"color":"#7AC5CD","network":"Visual","connections":["L-1.2"],"strength":"0.4"},
            {"name":"L-1.2","order":2,"color":"#7AC5CD","network":"Visual"}
        ]"##;
        let nodes = read_nodes_json(json.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].connections(), &["L-1.2".to_string()]);
    }

    #[test]
    fn test_read_nodes_csv() {
        let csv = "name,network,color,order,connections,strength,x,y,z\n\
                   A.1,3,#FF0000,1,A.2|A.3,0.5|0.25,10,20,\n\
                   A.2,3,#FF0000,2,,,,,\n";
        let nodes = read_nodes_csv(csv.as_bytes()).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].network, NetworkId::from(3i64));
        assert_eq!(
            nodes[0].connections(),
            &["A.2".to_string(), "A.3".to_string()]
        );
        assert_eq!(nodes[0].strength.as_deref(), Some("0.5|0.25"));
        assert_eq!(nodes[0].x, Some(10.0));
        assert_eq!(nodes[0].z, None);
        assert!(nodes[1].connections.is_none());
        assert!(nodes[1].strength.is_none());
    }

    #[test]
    fn test_read_parcels() {
        let csv = "ParcelID,Hem,ID,Community\n1,L,1,Default\n2,R,4,Visual\n";
        let parcels = read_parcels(csv.as_bytes()).unwrap();
        assert_eq!(parcels.len(), 2);
        assert_eq!(parcels[1].group(), "R-4");

        let layout = layout_from_parcels(&parcels);
        assert_eq!(layout.groups, vec!["L-1", "R-4"]);
        assert_eq!(
            layout.networks,
            Some(vec!["Default".to_string(), "Visual".to_string()])
        );
    }

    #[test]
    fn test_separator_for() {
        assert_eq!(separator_for(Path::new("m.tsv")).unwrap(), b'\t');
        assert_eq!(separator_for(Path::new("m.csv")).unwrap(), b',');
        assert!(separator_for(Path::new("m.xlsx")).is_err());
    }
}
