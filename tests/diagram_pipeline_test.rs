use connectogram::connections;
use connectogram::hierarchy::{self, Hierarchy};
use connectogram::{build_diagram, categories, DiagramOptions, InputNode};
use std::collections::HashSet;

fn brain_nodes() -> Vec<InputNode> {
    vec![
        InputNode::new("L-1.1", "Visual", "#7AC5CD", 1)
            .with_connections(&["L-1.2", "R-2.4"])
            .with_strength("0.82|-0.4"),
        InputNode::new("L-1.2", "Visual", "#7AC5CD", 2),
        InputNode::new("L-1.3", "Default", "#FF6347", 3),
        InputNode::new("R-2.4", "Default", "#FF6347", 4).with_connections(&["L-1.1"]),
        InputNode::new("R-2.5", "Visual", "#7AC5CD", 5),
    ]
}

#[test]
fn test_one_tree_node_per_distinct_name() {
    let nodes = brain_nodes();
    let tree = hierarchy::build(&nodes, &HashSet::new());

    // root + 5 rows + 2 synthesized groups
    assert_eq!(tree.len(), 8);
    for node in &nodes {
        assert!(tree.get(&node.name).is_some(), "missing {}", node.name);
    }
    assert!(tree.get("L-1").unwrap().is_synthesized());
}

#[test]
fn test_parent_is_prefix_and_keys_rebuild_names() {
    let nodes = vec![
        InputNode::new("a.b.c.d", "X", "red", 0),
        InputNode::new("a.b.e", "X", "red", 1),
        InputNode::new("f", "X", "red", 2),
    ];
    let tree = hierarchy::build(&nodes, &HashSet::new());

    for (id, node) in tree.nodes().enumerate().skip(1) {
        let parent = tree.parent(id).unwrap();
        let expected = node.name.rfind('.').map(|i| &node.name[..i]).unwrap_or("");
        assert_eq!(parent.name, expected);
        assert_eq!(tree.path_keys(id).join("."), node.name);
    }
    assert_eq!(tree.parent(Hierarchy::ROOT), None);
}

#[test]
fn test_ancestor_listed_after_child_keeps_its_data() {
    let nodes = vec![
        InputNode::new("G.1", "Visual", "#7AC5CD", 1).with_position(1.0, 2.0),
        InputNode::new("G", "Default", "#FF6347", 0).with_position(5.0, 6.0),
    ];
    let tree = hierarchy::build(&nodes, &HashSet::new());
    let group = tree.get("G").unwrap();

    assert!(!group.is_synthesized());
    assert_eq!(group.xcoord, Some(5.0));
    assert_eq!(tree.root().children.len(), 1);
}

#[test]
fn test_edge_values_follow_strength() {
    let nodes = vec![
        InputNode::new("A", "X", "red", 0)
            .with_connections(&["B", "C"])
            .with_strength("1.5|2"),
        InputNode::new("B", "X", "red", 1),
        InputNode::new("C", "X", "red", 2),
        InputNode::new("D", "X", "red", 3)
            .with_connections(&["A"])
            .with_strength("0"),
    ];
    let edges = connections::resolve(&nodes);

    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0].source.name, "A");
    assert_eq!(edges[0].target.unwrap().name, "B");
    assert_eq!(edges[0].value, 1.5);
    assert_eq!(edges[1].target.unwrap().name, "C");
    assert_eq!(edges[1].value, 2.0);
    assert_eq!(edges[2].value, 0.0);
}

#[test]
fn test_aggregation_of_contiguous_runs() {
    let nodes = vec![
        InputNode::new("n.1", "X", "red", 1),
        InputNode::new("n.2", "X", "red", 2),
        InputNode::new("n.3", "Y", "blue", 3),
    ];
    let stats = categories::aggregate(&nodes);

    assert_eq!(stats.count(&"X".into()), 2);
    assert_eq!(stats.count(&"Y".into()), 1);
    assert_eq!(stats.centroids, vec![2, 3]);
}

#[test]
fn test_makelabel_marks_centroid_keys() {
    let nodes = brain_nodes();
    let keys: HashSet<i64> = [2, 4].into_iter().collect();
    let tree = hierarchy::build(&nodes, &keys);

    let labelled: Vec<&str> = tree.labelled().map(|n| n.name.as_str()).collect();
    assert_eq!(labelled, vec!["L-1.2", "R-2.4"]);
}

#[test]
fn test_build_is_idempotent() {
    let nodes = brain_nodes();
    let options = DiagramOptions::default();

    let first = build_diagram("brain", &nodes, &options).unwrap();
    let second = build_diagram("brain", &nodes, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.tree.to_json_tree(), second.tree.to_json_tree());
}

#[test]
fn test_empty_input() {
    let nodes: Vec<InputNode> = Vec::new();
    let diagram = build_diagram("empty", &nodes, &DiagramOptions::default()).unwrap();

    assert_eq!(diagram.tree.len(), 1);
    assert!(diagram.tree.is_empty());
    assert!(diagram.edges.is_empty());
    assert!(diagram.stats.is_empty());
    assert!(diagram.report.is_clean());
}

#[test]
fn test_negative_weights_survive() {
    let nodes = brain_nodes();
    let diagram = build_diagram("brain", &nodes, &DiagramOptions::default()).unwrap();

    let values: Vec<f64> = diagram.edges.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![0.82, -0.4, 0.0]);
}
