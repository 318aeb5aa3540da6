use std::path::Path;

use clap::ValueEnum;
use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Configuration for the CLI.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configuration for compiling patterns.
    pub compile: CompileConfig,
    /// Configuration for the `scan` command.
    pub scan: ScanConfig,
    /// Configuration for the `nfa` and `dfa` commands.
    pub dump: DumpConfig,
}

/// Configuration for compiling patterns.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
    /// Simplify the pattern before building the automaton.
    pub optimize: bool,
    /// Convert the NFA into a DFA before scanning.
    pub deterministic: bool,
}

/// Configuration for the `scan` command.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Maximum number of matches printed per file. No limit if not set.
    #[serde(default)]
    pub max_matches: Option<usize>,
}

/// Configuration for the `nfa` and `dfa` commands.
#[derive(Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DumpConfig {
    /// Output format for automata.
    pub format: DumpFormat,
}

/// Formats in which automata can be printed.
#[derive(
    Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// One line per state, with its transitions.
    #[default]
    Text,
    /// Graphviz DOT language.
    Dot,
}

impl Default for CompileConfig {
    fn default() -> CompileConfig {
        CompileConfig { optimize: true, deterministic: true }
    }
}

/// Load a config file from a given path. Path must contain a valid TOML file
/// or this function will propagate the error. Settings missing from the
/// file take their default values.
pub fn load_config_from_file(
    config_file: &Path,
) -> Result<Config, Box<figment::Error>> {
    let config: Config =
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file_exact(config_file))
            .extract()?;
    Ok(config)
}
