//! CLI argument parsing for Arbol

use crate::node::NodeId;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the visible call tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented text tree (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// Standalone HTML page
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "arbol")]
#[command(version)]
#[command(about = "Lazy call-tree viewer for instrumented timing traces", long_about = None)]
pub struct Cli {
    /// Trace file to open (one JSON root call per line)
    #[arg(short = 'f', long = "file", value_name = "PATH", conflicts_with = "refresh")]
    pub file: Option<String>,

    /// Read trace data from a running backend instead of local files
    #[arg(long = "server", value_name = "URL")]
    pub server: Option<String>,

    /// Load view configuration from a TOML file
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Hide top-level calls not strictly slower than MS milliseconds
    #[arg(long = "root-threshold", value_name = "MS")]
    pub root_threshold: Option<f64>,

    /// Hide subcalls not strictly slower than MS milliseconds
    #[arg(short = 't', long = "threshold", value_name = "MS")]
    pub threshold: Option<f64>,

    /// Expand a call by id (e.g. 12 or 12/0/3); repeat to expand several, in order
    #[arg(short = 'e', long = "expand", value_name = "ID")]
    pub expand: Vec<NodeId>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Append the duration bucket to each line of text output
    #[arg(long = "severity")]
    pub severity: bool,

    /// List recently opened trace files
    #[arg(long = "recent")]
    pub recent: bool,

    /// Print the path of the active trace file
    #[arg(long = "active")]
    pub active: bool,

    /// Re-open the active trace file
    #[arg(long = "refresh")]
    pub refresh: bool,

    /// Ask the backend to shut down when done
    #[arg(long = "shutdown")]
    pub shutdown: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Whether a call tree will be loaded
    pub fn opens_tree(&self) -> bool {
        self.file.is_some() || self.refresh
    }
}
