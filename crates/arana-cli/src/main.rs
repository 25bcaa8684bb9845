//! CLI entry point for the arana person-association graph.
//!
//! Each subcommand loads the graph file, applies one operation and, for
//! mutations, saves the result back. Logs go to stderr so `--json` output on
//! stdout stays machine-readable.

mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use arana_core::{AttrValue, Attributes, EdgeKind, NodeKind};
use arana_graph::{ConnectionGraph, Person};
use arana_graphml::{export_graph_to_graphml_file, import_graph_from_graphml_file, GraphmlError};

use crate::config::{load_cli_config, CliConfig};

#[derive(Parser)]
#[command(name = "arana")]
#[command(about = "Build, search and persist a graph of people and their associations")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Graph file to operate on (default: cli.graph_file from config).
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Config file prefix (default: arana).
    #[arg(short, long, default_value = "arana", global = true)]
    config: String,

    /// Log every mutation (same as RUST_LOG=info).
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new, empty graph file.
    New {
        /// Graph name stored as metadata.
        #[arg(long)]
        name: Option<String>,
        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },
    /// List the graph's metadata, nodes and edges.
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add a person, linking any place, organization and account given.
    AddPerson {
        name: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        place: String,
        #[arg(long, default_value = "")]
        org: String,
        #[arg(long, default_value = "")]
        account: String,
        /// Comma-separated skills, e.g. "Python,Rust".
        #[arg(long, default_value = "")]
        skills: String,
    },
    /// Add a node of any kind: person, organization, place, account.
    AddNode {
        label: String,
        kind: String,
        /// Extra attribute as key=value (repeatable).
        #[arg(long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Add a directed edge: assocwith, basedin, onaccount.
    AddEdge {
        origin: String,
        destination: String,
        kind: String,
        /// Extra attribute as key=value (repeatable).
        #[arg(long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Find people with a skill.
    Search {
        skill: String,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli_config = load_cli_config(&cli.config)?;
    let path = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cli_config.graph_file));
    tracing::debug!(path = %path.display(), "Using graph file");

    match cli.command {
        Command::New { name, force } => new_graph(&path, name, force, &cli_config)?,
        Command::Show { json } => {
            let graph = load_graph(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&render::graph_json(&graph))?);
            } else {
                print!("{}", render::graph_listing(&graph));
            }
        }
        Command::AddPerson {
            name,
            role,
            place,
            org,
            account,
            skills,
        } => {
            if name.trim().is_empty() {
                anyhow::bail!("Person name must not be empty");
            }
            let mut graph = load_graph(&path)?;
            graph.add_person(&Person {
                name,
                role,
                place,
                org,
                account,
                skills,
            });
            save_graph(&graph, &path)?;
        }
        Command::AddNode { label, kind, attrs } => {
            let kind = kind.to_uppercase();
            if !NodeKind::is_valid(&kind) {
                anyhow::bail!("Unknown node kind: {kind}. Choose: {}", kind_names(&NodeKind::ALL));
            }
            let mut graph = load_graph(&path)?;
            if !graph.add_node(&label, &kind, to_attributes(attrs)) {
                anyhow::bail!("Node {label:?} was rejected");
            }
            save_graph(&graph, &path)?;
        }
        Command::AddEdge {
            origin,
            destination,
            kind,
            attrs,
        } => {
            let kind = kind.to_uppercase();
            if !EdgeKind::is_valid(&kind) {
                anyhow::bail!("Unknown edge kind: {kind}. Choose: {}", kind_names(&EdgeKind::ALL));
            }
            let mut graph = load_graph(&path)?;
            for endpoint in [&origin, &destination] {
                if !graph.contains_node(endpoint) {
                    anyhow::bail!("No node named {endpoint:?}; add it first");
                }
            }
            graph.add_edge(&origin, &destination, &kind, to_attributes(attrs));
            save_graph(&graph, &path)?;
        }
        Command::Search { skill, json } => {
            let graph = load_graph(&path)?;
            let result = graph.search_for_person_with_skill(&skill);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.is_empty() {
                println!("No one with skill {skill:?}");
            } else {
                print!("{}", render::search_table(&result.summaries));
            }
        }
    }

    Ok(())
}

fn new_graph(path: &Path, name: Option<String>, force: bool, config: &CliConfig) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            path.display()
        );
    }

    let mut meta = Attributes::new();
    if let Some(name) = name.or_else(|| config.default_graph_name.clone()) {
        meta.insert("name".to_string(), AttrValue::from(name));
    }
    save_graph(&ConnectionGraph::with_attributes(meta), path)?;
    println!("Created {}", path.display());
    Ok(())
}

fn load_graph(path: &Path) -> anyhow::Result<ConnectionGraph> {
    match import_graph_from_graphml_file(path) {
        Ok(graph) => Ok(graph),
        Err(e @ GraphmlError::FileNotFound { .. }) => {
            anyhow::bail!("{e}. Create it with `arana new`")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn save_graph(graph: &ConnectionGraph, path: &Path) -> anyhow::Result<()> {
    export_graph_to_graphml_file(graph, path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

fn parse_attr(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

fn to_attributes(pairs: Vec<(String, String)>) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key, AttrValue::from(value)))
        .collect()
}

fn kind_names<K: std::fmt::Display>(kinds: &[K]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attr() {
        assert_eq!(
            parse_attr("country=Peru"),
            Ok(("country".to_string(), "Peru".to_string()))
        );
        assert_eq!(
            parse_attr("url=https://x.io/?a=b"),
            Ok(("url".to_string(), "https://x.io/?a=b".to_string()))
        );
        assert!(parse_attr("novalue").is_err());
        assert!(parse_attr("=x").is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(kind_names(&EdgeKind::ALL), "assocwith, basedin, onaccount");
    }

    #[test]
    fn test_cli_parses_add_person() {
        let cli = Cli::try_parse_from([
            "arana",
            "--file",
            "g.graphml",
            "add-person",
            "John Doe",
            "--place",
            "New York",
            "--skills",
            "Python,Rust",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("g.graphml")));
        match cli.command {
            Command::AddPerson {
                name, place, org, ..
            } => {
                assert_eq!(name, "John Doe");
                assert_eq!(place, "New York");
                assert_eq!(org, "");
            }
            _ => panic!("expected add-person"),
        }
    }

    #[test]
    fn test_load_missing_graph_reports_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_graph(&dir.path().join("none.graphml")).unwrap_err();
        assert!(err.to_string().contains("arana new"));
    }

    #[test]
    fn test_new_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.graphml");
        let config = CliConfig::default();

        new_graph(&path, Some("case".to_string()), false, &config).unwrap();
        assert!(new_graph(&path, None, false, &config).is_err());

        let graph = load_graph(&path).unwrap();
        assert_eq!(graph.graph().get("name"), Some(&AttrValue::from("case")));
        assert_eq!(graph.node_count(), 0);
    }
}
