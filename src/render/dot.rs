//! Graphviz DOT emission for a validated diagram.

use crate::topology::{ClusterId, Diagram};
use std::collections::BTreeMap;

const GRAPH_DEFAULTS: &[(&str, &str)] = &[
    ("pad", "2.0"),
    ("splines", "ortho"),
    ("nodesep", "0.60"),
    ("ranksep", "0.75"),
    ("fontname", "Sans-Serif"),
    ("fontsize", "15"),
    ("fontcolor", "#2D3436"),
    ("labelloc", "t"),
];

const NODE_DEFAULTS: &str = r##"shape="box", style="rounded,filled", fontname="Sans-Serif", fontsize="13", fontcolor="white", margin="0.2,0.1""##;

const EDGE_DEFAULTS: &str =
    r##"color="#7B8894", fontname="Sans-Serif", fontsize="13", fontcolor="#2D3436""##;

/// Background per cluster nesting depth, cycling for deeper levels.
const CLUSTER_COLORS: &[&str] = &["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

/// Render a diagram as Graphviz DOT.
///
/// Output is deterministic: attributes are sorted, nodes and clusters appear
/// in declaration order, nodes are named `n<index>` and clusters
/// `cluster_<index>`.
pub fn to_dot(diagram: &Diagram) -> String {
    let mut graph_attrs: BTreeMap<String, String> = GRAPH_DEFAULTS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    graph_attrs.insert("label".into(), diagram.title.clone());
    graph_attrs.insert("rankdir".into(), diagram.direction.as_str().into());
    for (k, v) in &diagram.graph_attrs {
        graph_attrs.insert(k.clone(), v.clone());
    }

    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", escape(&diagram.title)));
    out.push_str(&format!(
        "    graph [{}];\n",
        attr_list(graph_attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    ));
    out.push_str(&format!("    node [{}];\n", NODE_DEFAULTS));
    out.push_str(&format!("    edge [{}];\n", EDGE_DEFAULTS));
    out.push('\n');

    write_scope(diagram, None, 1, &mut out);

    if !diagram.edges.is_empty() {
        out.push('\n');
    }
    for edge in &diagram.edges {
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if let Some(label) = &edge.style.label {
            attrs.push(("label", label.as_str()));
        }
        if let Some(line) = edge.style.line {
            attrs.push(("style", line.as_str()));
        }
        if let Some(color) = &edge.style.color {
            attrs.push(("color", color.as_str()));
        }
        if attrs.is_empty() {
            out.push_str(&format!("    n{} -> n{};\n", edge.from.0, edge.to.0));
        } else {
            out.push_str(&format!(
                "    n{} -> n{} [{}];\n",
                edge.from.0,
                edge.to.0,
                attr_list(attrs)
            ));
        }
    }

    out.push_str("}\n");
    out
}

/// Emit the nodes and sub-clusters that live directly inside `scope`.
fn write_scope(diagram: &Diagram, scope: Option<ClusterId>, depth: usize, out: &mut String) {
    let pad = "    ".repeat(depth);

    for id in diagram.nodes_in(scope) {
        let node = &diagram.nodes[id.0];
        let tooltip = node.category.to_string();
        out.push_str(&format!(
            "{}n{} [{}];\n",
            pad,
            id.0,
            attr_list([
                ("label", node.label.as_str()),
                ("fillcolor", node.category.fill_color()),
                ("tooltip", tooltip.as_str()),
            ])
        ));
    }

    for cid in diagram.child_clusters(scope) {
        let cluster = &diagram.clusters[cid.0];
        let color = CLUSTER_COLORS[diagram.cluster_depth(cid) % CLUSTER_COLORS.len()];
        out.push_str(&format!("{}subgraph cluster_{} {{\n", pad, cid.0));
        out.push_str(&format!(
            "{}    graph [{}];\n",
            pad,
            attr_list([
                ("label", cluster.label.as_str()),
                ("bgcolor", color),
                ("pencolor", "#AEB6BF"),
                ("labeljust", "l"),
                ("style", "rounded"),
                ("fontsize", "12"),
            ])
        ));
        write_scope(diagram, Some(cid), depth + 1, out);
        out.push_str(&format!("{}}}\n", pad));
    }
}

fn attr_list<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    attrs
        .into_iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape(v)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape a DOT double-quoted string. Newlines become centered line breaks.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
