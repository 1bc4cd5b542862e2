use crate::diagram::DiagramData;
use serde_json::{json, Value};
use std::error::Error;

pub fn render(diagram: &DiagramData) -> Result<String, Box<dyn Error>> {
    let handlebars = crate::common::get_handlebars();

    let nodes: Vec<Value> = diagram
        .tree
        .nodes()
        .map(|n| {
            json!({
                "id": n.name,
                "label": n.key.as_deref().unwrap_or("root"),
                "color": n.data.as_ref().map(|d| d.color.as_str()),
                "makelabel": n.makelabel,
            })
        })
        .collect();

    let hierarchy_edges: Vec<Value> = diagram
        .tree
        .hierarchy_edges()
        .into_iter()
        .map(|(source, target)| json!({"source": source, "target": target}))
        .collect();

    let connection_edges: Vec<Value> = diagram
        .edges
        .iter()
        .filter(|e| e.is_resolved())
        .map(|e| {
            json!({
                "source": e.source.name,
                "target": e.reference,
                "value": e.value,
                "penwidth": 1.0 + e.value.abs() * 2.0,
            })
        })
        .collect();

    let res = handlebars.render_template(
        &get_template(),
        &json!({
            "graph_name": diagram.name,
            "nodes": nodes,
            "hierarchy_edges": hierarchy_edges,
            "connection_edges": connection_edges,
        }),
    )?;
    Ok(res)
}

pub fn get_template() -> String {
    let template = r##"
digraph "{{graph_name}}" {
    rankdir="LR";
    splines=true;
    overlap=false;
    fontname="Lato";
    node [shape="plaintext" style="filled, rounded" fontsize=12 fillcolor="#dddddd"]
    edge [fontname="Lato" color="#2B303A" fontsize=8]

  {{#each nodes as |node|}}
    {{#if (exists node.color)}}
    "{{node.id}}" [label="{{node.label}}" fillcolor="{{node.color}}"{{#if node.makelabel}} penwidth=2{{/if}}];
    {{else}}
    "{{node.id}}" [label="{{node.label}}"];
    {{/if}}
  {{/each}}

  {{#each hierarchy_edges as |edge|}}
    "{{edge.source}}" -> "{{edge.target}}";
  {{/each}}

  {{#each connection_edges as |edge|}}
    "{{edge.source}}" -> "{{edge.target}}" [style="dashed" constraint=false penwidth={{edge.penwidth}} label="{{edge.value}}"];
  {{/each}}
}
"##;

    template.to_string()
}
