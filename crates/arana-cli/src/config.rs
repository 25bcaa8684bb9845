//! Configuration for the arana command-line tool.

use serde::Deserialize;

/// Settings from the `[cli]` section of `arana.toml` or `ARANA__CLI__*`
/// environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Graph file used when `--file` is not given (default: "graph.graphml").
    #[serde(default = "default_graph_file")]
    pub graph_file: String,

    /// Graph name stored as metadata by `arana new` when `--name` is not given.
    #[serde(default)]
    pub default_graph_name: Option<String>,
}

fn default_graph_file() -> String {
    "graph.graphml".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            graph_file: default_graph_file(),
            default_graph_name: None,
        }
    }
}

/// Load the `[cli]` section, falling back to defaults when it is absent.
pub fn load_cli_config(file_prefix: &str) -> anyhow::Result<CliConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("ARANA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<CliConfig>("cli") {
        Ok(c) => Ok(c),
        Err(_) => Ok(CliConfig::default()),
    }
}
