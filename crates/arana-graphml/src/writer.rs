//! GraphML export.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use arana_core::Attributes;
use arana_graph::ConnectionGraph;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{GraphmlError, Result};
use crate::schema::{encode_value, KeyDomain, ValueType, GRAPHML_NS, SCHEMA_LOCATION, XSI_NS};

/// Key declarations needed for one graph: one per (domain, name, type),
/// numbered `d0, d1, ...` in sorted order.
struct KeyTable {
    ids: BTreeMap<(KeyDomain, String, ValueType), String>,
}

impl KeyTable {
    fn collect(graph: &ConnectionGraph) -> Self {
        let mut seen = BTreeSet::new();
        let mut note = |domain: KeyDomain, attrs: &Attributes| {
            for (name, value) in attrs {
                seen.insert((domain, name.clone(), ValueType::of(value)));
            }
        };

        note(KeyDomain::Graph, graph.graph());
        for (label, node) in graph.nodes() {
            note(KeyDomain::Node, &node.attributes(label));
        }
        for edge in graph.edges().values() {
            note(KeyDomain::Edge, &edge.attributes());
        }

        let ids = seen
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, format!("d{i}")))
            .collect();
        Self { ids }
    }

    fn id(&self, domain: KeyDomain, name: &str, value_type: ValueType) -> &str {
        self.ids
            .get(&(domain, name.to_string(), value_type))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// Serialize `graph` as a GraphML document into `out`.
pub fn write_graphml<W: Write>(graph: &ConnectionGraph, out: W) -> Result<()> {
    let keys = KeyTable::collect(graph);
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("graphml");
    root.push_attribute(("xmlns", GRAPHML_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    writer.write_event(Event::Start(root))?;

    for ((domain, name, value_type), id) in &keys.ids {
        let mut key = BytesStart::new("key");
        key.push_attribute(("id", id.as_str()));
        key.push_attribute(("for", domain.as_str()));
        key.push_attribute(("attr.name", name.as_str()));
        key.push_attribute(("attr.type", value_type.as_str()));
        writer.write_event(Event::Empty(key))?;
    }

    let mut graph_start = BytesStart::new("graph");
    graph_start.push_attribute(("edgedefault", "directed"));
    writer.write_event(Event::Start(graph_start))?;

    write_data(&mut writer, &keys, KeyDomain::Graph, graph.graph())?;

    for (label, node) in graph.nodes() {
        let mut start = BytesStart::new("node");
        start.push_attribute(("id", label.as_str()));
        writer.write_event(Event::Start(start))?;
        write_data(&mut writer, &keys, KeyDomain::Node, &node.attributes(label))?;
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }

    for ((origin, destination), edge) in graph.edges() {
        let mut start = BytesStart::new("edge");
        start.push_attribute(("source", origin.as_str()));
        start.push_attribute(("target", destination.as_str()));
        writer.write_event(Event::Start(start))?;
        write_data(&mut writer, &keys, KeyDomain::Edge, &edge.attributes())?;
        writer.write_event(Event::End(BytesEnd::new("edge")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;

    tracing::debug!(
        keys = keys.ids.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "GraphML written"
    );
    Ok(())
}

fn write_data<W: Write>(
    writer: &mut Writer<W>,
    keys: &KeyTable,
    domain: KeyDomain,
    attrs: &Attributes,
) -> Result<()> {
    for (name, value) in attrs {
        let mut data = BytesStart::new("data");
        data.push_attribute(("key", keys.id(domain, name, ValueType::of(value))));

        let text = encode_value(value);
        if text.is_empty() {
            writer.write_event(Event::Empty(data))?;
            continue;
        }
        writer.write_event(Event::Start(data))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(&text))))?;
        writer.write_event(Event::End(BytesEnd::new("data")))?;
    }
    Ok(())
}

/// Escape `text` for element content. Leading and trailing whitespace is
/// written as character references, which XML readers do not trim.
fn escape_text(text: &str) -> String {
    let start = text.len() - text.trim_start_matches(is_xml_space).len();
    let end = start.max(text.trim_end_matches(is_xml_space).len());

    let mut out: String = text[..start].chars().map(char_ref).collect();
    out.push_str(&escape(&text[start..end]));
    out.extend(text[end..].chars().map(char_ref));
    out
}

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

fn char_ref(c: char) -> String {
    format!("&#{};", u32::from(c))
}

/// Render `graph` as a GraphML string.
pub fn to_graphml_string(graph: &ConnectionGraph) -> Result<String> {
    let mut buf = Vec::new();
    write_graphml(graph, &mut buf)?;
    String::from_utf8(buf).map_err(|e| GraphmlError::Encoding(e.to_string()))
}

/// Write `graph` to a GraphML file at `path`, creating parent directories.
///
/// The document is written to a sibling `.tmp` file first and renamed over
/// `path`, so a failed write leaves any existing file intact.
pub fn export_graph_to_graphml_file(graph: &ConnectionGraph, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    if let Err(e) = write_file(graph, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;

    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph exported"
    );
    Ok(())
}

fn write_file(graph: &ConnectionGraph, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_graphml(graph, &mut out)?;
    out.flush()?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
