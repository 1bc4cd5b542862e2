use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::node::{split_name, InputNode};

/// Index of a [`TreeNode`] inside its [`Hierarchy`].
pub type TreeNodeId = usize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub key: Option<String>,
    pub children: Vec<TreeNodeId>,
    pub parent: Option<TreeNodeId>,
    pub xcoord: Option<f64>,
    pub ycoord: Option<f64>,
    pub makelabel: bool,
    /// The input row this node was built from; `None` for synthesized
    /// ancestors.
    pub data: Option<InputNode>,
}

impl TreeNode {
    fn new(name: &str, data: Option<&InputNode>) -> Self {
        Self {
            name: name.to_string(),
            key: None,
            children: Vec::new(),
            parent: None,
            xcoord: data.and_then(|d| d.x),
            ycoord: data.and_then(|d| d.y),
            makelabel: false,
            data: data.cloned(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_synthesized(&self) -> bool {
        self.data.is_none()
    }
}

/// Tree reconstructed from dotted names. Nodes live in an arena; ids are
/// stable for the lifetime of the hierarchy and the root is always
/// [`Hierarchy::ROOT`].
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    index: IndexMap<String, TreeNodeId>,
}

impl Hierarchy {
    pub const ROOT: TreeNodeId = 0;

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: TreeNodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn get(&self, name: &str) -> Option<&TreeNode> {
        self.index.get(name).map(|&id| &self.nodes[id])
    }

    pub fn id_of(&self, name: &str) -> Option<TreeNodeId> {
        self.index.get(name).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    pub fn children(&self, id: TreeNodeId) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&child| &self.nodes[child])
    }

    pub fn parent(&self, id: TreeNodeId) -> Option<&TreeNode> {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .map(|p| &self.nodes[p])
    }

    /// Keys from the root down to `id`. Joined with `.` they give the
    /// node's name back.
    pub fn path_keys(&self, id: TreeNodeId) -> Vec<&str> {
        let mut keys = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if let Some(key) = &node.key {
                keys.push(key.as_str());
            }
            current = node.parent.map(|p| &self.nodes[p]);
        }
        keys.reverse();
        keys
    }

    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().skip(1).filter(|n| n.is_leaf())
    }

    pub fn labelled(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.makelabel)
    }

    /// Parent/child pairs by name, in depth-first pre-order.
    pub fn hierarchy_edges(&self) -> Vec<(&str, &str)> {
        let mut edges = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            for &child in &node.children {
                edges.push((node.name.as_str(), self.nodes[child].name.as_str()));
            }
            stack.extend(node.children.iter().rev());
        }
        edges
    }

    /// Nested JSON rendition for layout engines: each object carries the
    /// fields of its input row (if any) plus `name`, `key`, `xcoord`,
    /// `ycoord`, `makelabel` and `children`.
    pub fn to_json_tree(&self) -> Value {
        fn build(hierarchy: &Hierarchy, id: TreeNodeId) -> Value {
            let node = &hierarchy.nodes[id];
            let mut object = match node.data.as_ref().map(serde_json::to_value) {
                Some(Ok(Value::Object(map))) => map,
                _ => Map::new(),
            };
            object.insert("name".to_string(), json!(node.name));
            if let Some(key) = &node.key {
                object.insert("key".to_string(), json!(key));
                object.insert("xcoord".to_string(), json!(node.xcoord));
                object.insert("ycoord".to_string(), json!(node.ycoord));
                object.insert("makelabel".to_string(), json!(node.makelabel));
            }
            let children: Vec<Value> = node
                .children
                .iter()
                .map(|&child| build(hierarchy, child))
                .collect();
            object.insert("children".to_string(), Value::Array(children));
            Value::Object(object)
        }

        build(self, Self::ROOT)
    }
}

/// True when `key`, read as an integer, is one of the centroid keys.
pub fn is_label_key(key: &str, centroid_keys: &HashSet<i64>) -> bool {
    key.trim()
        .parse::<i64>()
        .map(|k| centroid_keys.contains(&k))
        .unwrap_or(false)
}

/// Builds the name tree for one call. Holds the memo map, so nothing
/// outlives a single `build`.
pub struct HierarchyBuilder<'a> {
    centroid_keys: &'a HashSet<i64>,
    data: HashMap<&'a str, &'a InputNode>,
    nodes: Vec<TreeNode>,
    index: IndexMap<String, TreeNodeId>,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(nodes: &'a [InputNode], centroid_keys: &'a HashSet<i64>) -> Self {
        // First pass: every real row is known before any ancestor is
        // synthesized. First occurrence wins for tree data.
        let mut data = HashMap::with_capacity(nodes.len());
        for node in nodes {
            data.entry(node.name.as_str()).or_insert(node);
        }

        let mut builder = Self {
            centroid_keys,
            data,
            nodes: Vec::with_capacity(nodes.len() + 1),
            index: IndexMap::with_capacity(nodes.len() + 1),
        };
        builder.resolve("");
        builder
    }

    /// Looks up `name`, creating it and any missing ancestors on first use.
    pub fn resolve(&mut self, name: &str) -> TreeNodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }

        let data = self.data.get(name).copied();
        let id = self.nodes.len();
        self.nodes.push(TreeNode::new(name, data));
        self.index.insert(name.to_string(), id);

        if !name.is_empty() {
            let (parent_name, key) = split_name(name);
            let parent = self.resolve(parent_name);
            self.nodes[parent].children.push(id);

            let node = &mut self.nodes[id];
            node.parent = Some(parent);
            node.makelabel = is_label_key(key, self.centroid_keys);
            node.key = Some(key.to_string());
        }

        id
    }

    pub fn finish(self) -> Hierarchy {
        Hierarchy {
            nodes: self.nodes,
            index: self.index,
        }
    }
}

/// Reconstructs the tree for `nodes`. Siblings appear in the order their
/// names are first met while scanning the input.
pub fn build(nodes: &[InputNode], centroid_keys: &HashSet<i64>) -> Hierarchy {
    let mut builder = HierarchyBuilder::new(nodes, centroid_keys);
    for node in nodes {
        builder.resolve(&node.name);
    }
    let hierarchy = builder.finish();

    debug!(
        "Built hierarchy with {} nodes ({} synthesized) from {} input nodes",
        hierarchy.len(),
        hierarchy.nodes().filter(|n| n.is_synthesized()).count(),
        nodes.len()
    );

    hierarchy
}
