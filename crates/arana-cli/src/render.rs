//! Plain-text and JSON views of the graph for terminal output.

use arana_graph::{ConnectionGraph, PersonSummary};
use serde_json::{json, Value};

const SEARCH_HEADERS: [&str; 6] = [
    "Name",
    "Role",
    "Location",
    "Organization",
    "Account",
    "Skills",
];

/// Render search summaries as an aligned table, one row per person.
pub fn search_table(summaries: &[PersonSummary]) -> String {
    let rows: Vec<[String; 6]> = summaries
        .iter()
        .map(|s| {
            [
                s.name.clone(),
                s.role.clone(),
                s.locations.join(", "),
                s.organizations.join(", "),
                s.accounts.join(", "),
                s.skills.clone(),
            ]
        })
        .collect();

    let mut widths = SEARCH_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &SEARCH_HEADERS.map(String::from), &widths);
    let rule = widths.map(|w| "-".repeat(w));
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

/// Human-readable listing of everything in the graph.
pub fn graph_listing(graph: &ConnectionGraph) -> String {
    let mut out = String::new();
    for (key, value) in graph.graph() {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str(&format!(
        "{} nodes, {} edges\n",
        graph.node_count(),
        graph.edge_count()
    ));

    for (label, node) in graph.nodes() {
        out.push_str(&format!("  {label} [{}]", node.kind()));
        let extras: Vec<String> = node
            .attrs()
            .iter()
            .filter(|(_, v)| !v.to_string().is_empty())
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        if !extras.is_empty() {
            out.push_str(&format!(" {}", extras.join(" ")));
        }
        out.push('\n');
    }
    for ((origin, destination), edge) in graph.edges() {
        out.push_str(&format!("  {origin} -[{}]-> {destination}\n", edge.kind()));
    }
    out
}

/// JSON document with the flattened attributes of every node and edge.
pub fn graph_json(graph: &ConnectionGraph) -> Value {
    let nodes: serde_json::Map<String, Value> = graph
        .nodes()
        .iter()
        .map(|(label, node)| (label.clone(), json!(node.attributes(label))))
        .collect();
    let edges: Vec<Value> = graph
        .edges()
        .iter()
        .map(|((origin, destination), edge)| {
            json!({
                "origin": origin,
                "destination": destination,
                "attributes": edge.attributes(),
            })
        })
        .collect();

    json!({
        "graph": graph.graph(),
        "nodes": nodes,
        "edges": edges,
    })
}
