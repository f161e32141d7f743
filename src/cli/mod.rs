// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::naming::APP_NAME;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// 出力フォーマット
#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Structured JSON output
    Json,
}

/// pgschemadiff - PostgreSQL schema comparison CLI
///
/// Compares two snapshots of database object metadata and reports
/// which objects were added, removed, changed or left untouched.
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare PostgreSQL schema metadata snapshots")]
#[command(long_about = "pgschemadiff - PostgreSQL schema comparison CLI

Compares two snapshots of database object metadata (JSON files keyed by
object category and object name) and classifies every object as
source only, target only, different or identical.

Snapshot format:
  {
    \"_meta\": { \"scid\": 2200, \"schema\": \"public\" },
    \"table\": { \"users\": { \"oid\": 16384, \"name\": \"users\", ... } }
  }")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Compare two snapshots:         pgschemadiff compare --source a.json --target b.json
  2. Limit to some categories:      pgschemadiff compare -s a.json -t b.json --category table
  3. Inspect one object in detail:  pgschemadiff diff -s a.json -t b.json --category table --object users

For detailed help on each command, use: pgschemadiff <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two schema snapshots
    ///
    /// Every object of every selected category is classified as
    /// source only, target only, different or identical.
    ///
    /// EXAMPLES:
    ///   # Compare all categories
    ///   pgschemadiff compare --source prod.json --target staging.json
    ///
    ///   # Compare tables and functions only, ignoring owners
    ///   pgschemadiff compare -s prod.json -t staging.json --category table --category function --ignore-owner
    ///
    ///   # JSON report
    ///   pgschemadiff --format json compare -s prod.json -t staging.json
    Compare {
        /// Source snapshot file
        #[arg(short, long, value_name = "FILE")]
        source: PathBuf,

        /// Target snapshot file
        #[arg(short, long, value_name = "FILE")]
        target: PathBuf,

        /// Object category to compare (repeatable, default: all categories in both snapshots)
        #[arg(long = "category", value_name = "NAME")]
        categories: Vec<String>,

        /// Ignore owner differences
        #[arg(long)]
        ignore_owner: bool,

        /// Ignore whitespace differences in string values
        #[arg(long)]
        ignore_whitespaces: bool,

        /// Schema name to rewrite source-only objects into
        #[arg(long, value_name = "NAME")]
        target_schema: Option<String>,
    },

    /// Show the difference dictionary of a single object
    ///
    /// EXAMPLES:
    ///   pgschemadiff diff -s prod.json -t staging.json --category table --object users
    Diff {
        /// Source snapshot file
        #[arg(short, long, value_name = "FILE")]
        source: PathBuf,

        /// Target snapshot file
        #[arg(short, long, value_name = "FILE")]
        target: PathBuf,

        /// Object category
        #[arg(long, value_name = "NAME")]
        category: String,

        /// Object name
        #[arg(long, value_name = "NAME")]
        object: String,

        /// Ignore owner differences
        #[arg(long)]
        ignore_owner: bool,

        /// Ignore whitespace differences in string values
        #[arg(long)]
        ignore_whitespaces: bool,
    },
}
