use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| !v.is_null());
    handlebars.register_helper("exists", Box::new(exists));

    handlebars_helper!(isnull: |v: Value| v.is_null());
    handlebars.register_helper("isnull", Box::new(isnull));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handlebars_can_iterate_edges() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#each edges as |edge|}}
{{edge.source}} -> {{edge.target}}
{{/each}}"#,
                &json!({"edges": [
                    {"source": "L-1", "target": "L-1.3"},
                    {"source": "L-1", "target": "L-1.4"}
                ]}),
            )
            .expect("This to render");
        assert_eq!(res, "L-1 -> L-1.3\nL-1 -> L-1.4\n");
    }

    #[test]
    fn handlebars_helper_stringeq_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#if (stringeq "Visual" node.network) }}{{node.name}}{{/if}}"#,
                &json!({"node": {"name": "R-2.7", "network": "Visual"}}),
            )
            .expect("This to render");
        assert_eq!(res, "R-2.7");
    }

    #[test]
    fn handlebars_helper_exists_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#if (exists node.color) }}{{node.color}}{{else}}none{{/if}}"#,
                &json!({"node": {"color": null}}),
            )
            .expect("This to render");
        assert_eq!(res, "none");
    }

    #[test]
    fn write_string_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("edges.csv");
        write_string_to_file(&path, "source,target\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "source,target\n");
    }
}
