use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

/// Category identifier of a node.
///
/// Source data carries networks either as strings or as numbers. Both are
/// normalized to their decimal string so that `1` and `"1"` name the same
/// category.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NetworkId(String);

impl NetworkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NetworkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NetworkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for NetworkId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNetworkId {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawNetworkId::deserialize(deserializer)? {
            RawNetworkId::Integer(i) => NetworkId::from(i),
            RawNetworkId::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                NetworkId::from(f as i64)
            }
            RawNetworkId::Float(f) => NetworkId(f.to_string()),
            RawNetworkId::Text(s) => NetworkId(s),
        })
    }
}

/// A labeled entity as supplied by the loader.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InputNode {
    pub name: String,
    pub network: NetworkId,
    pub color: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One `|`-separated segment of a strength string.
#[derive(Clone, Debug, PartialEq)]
pub enum Weight {
    Value(f64),
    Malformed(String),
}

impl InputNode {
    pub fn new(name: &str, network: impl Into<NetworkId>, color: &str, order: i64) -> Self {
        Self {
            name: name.to_string(),
            network: network.into(),
            color: color.to_string(),
            order,
            connections: None,
            strength: None,
            x: None,
            y: None,
            z: None,
            image: None,
        }
    }

    pub fn with_connections(mut self, connections: &[&str]) -> Self {
        self.connections = Some(connections.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_strength(mut self, strength: &str) -> Self {
        self.strength = Some(strength.to_string());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn connections(&self) -> &[String] {
        self.connections.as_deref().unwrap_or_default()
    }

    /// Parses `strength` into its weights. Returns `None` when the node
    /// carries no strength data; an empty string counts as absent.
    pub fn weights(&self) -> Option<Vec<Weight>> {
        let raw = self.strength.as_deref().filter(|s| !s.is_empty())?;
        Some(raw.split('|').map(parse_weight).collect())
    }

    /// Last path segment of the dotted name.
    pub fn key(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }
}

fn parse_weight(segment: &str) -> Weight {
    match segment.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Weight::Value(value),
        _ => Weight::Malformed(segment.to_string()),
    }
}

/// Splits a dotted name into its parent path and key. Top-level names have
/// the root (`""`) as parent.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], &name[idx + 1..]),
        None => ("", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_id_accepts_numbers_and_strings() {
        let ids: Vec<NetworkId> = serde_json::from_str(r#"[1, "1", 2.0, "Default"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "2");
        assert_eq!(ids[3].as_str(), "Default");
    }

    #[test]
    fn test_deserialize_input_node() {
        let json = r##"{"name":"R-1.12","strength":"0.5|-0.25","x":99,"y":99,"z":99,
            "image":"#","order":12,"color":"#7AC5CD","network":"3",
            "connections":["L-2.4","R-1.13"]}"##;
        let node: InputNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.name, "R-1.12");
        assert_eq!(node.order, 12);
        assert_eq!(node.network, NetworkId::from("3"));
        assert_eq!(node.connections().len(), 2);
        assert_eq!(node.x, Some(99.0));
        assert_eq!(node.key(), "12");
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let node: InputNode =
            serde_json::from_str(r#"{"name":"A","network":1,"color":"red","order":0}"#).unwrap();
        assert!(node.connections.is_none());
        assert!(node.weights().is_none());
        assert!(node.connections().is_empty());
    }

    #[test]
    fn test_weights() {
        let node = InputNode::new("A", "X", "red", 0).with_strength("1.5| 2 |abc");
        assert_eq!(
            node.weights().unwrap(),
            vec![
                Weight::Value(1.5),
                Weight::Value(2.0),
                Weight::Malformed("abc".to_string())
            ]
        );

        let empty = InputNode::new("A", "X", "red", 0).with_strength("");
        assert!(empty.weights().is_none());
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("R.12.occipital"), ("R.12", "occipital"));
        assert_eq!(split_name("R"), ("", "R"));
        assert_eq!(split_name("R."), ("R", ""));
    }
}
