//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cache::KeyMode;
use crate::config::Config;
use crate::models::requests::DEFAULT_SOURCE;

/// Local documentation cache with TTL expiry and in-document search
#[derive(Debug, Parser)]
#[command(
    name = "doccache",
    version,
    about = "Disk-backed cache for fetched documentation",
    after_help = "Status lines (HIT/MISS/EXPIRED/ERROR) are printed on stdout; logs go to stderr (RUST_LOG)."
)]
pub struct Cli {
    /// How keys are addressed
    #[arg(long, global = true, value_enum, default_value_t = KeyMode::Library)]
    pub mode: KeyMode,

    /// Cache root directory (overrides DOCCACHE_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Entry TTL in seconds for writes (overrides DOCCACHE_TTL)
    #[arg(long, global = true)]
    pub ttl: Option<u64>,

    /// Lines of context around each query match (overrides DOCCACHE_CONTEXT_LINES)
    #[arg(long, global = true)]
    pub context: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report whether a key is cached and print the document on a hit
    Check {
        /// Library identifier or query text
        key: String,
    },

    /// Cache a document read from stdin
    Write {
        /// Library identifier or query text
        key: String,

        /// Provenance label stored with the entry
        #[arg(default_value = DEFAULT_SOURCE)]
        source: String,
    },

    /// Search inside a cached document
    Query {
        /// Library identifier or query text
        key: String,

        /// Search terms; any term matching a line selects it
        #[arg(required = true, num_args = 1..)]
        terms: Vec<String>,
    },

    /// Remove every expired entry under the cache root
    Sweep,

    /// Serve the cache over HTTP on localhost with a background sweeper
    Serve {
        /// Port to listen on (overrides DOCCACHE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Applies command-line overrides on top of environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(root) = &self.root {
            config.cache_root = root.clone();
        }
        if let Some(ttl) = self.ttl {
            config.ttl = ttl;
        }
        if let Some(context) = self.context {
            config.context_lines = context;
        }
        if let Command::Serve { port: Some(port) } = &self.command {
            config.server_port = *port;
        }
    }
}
