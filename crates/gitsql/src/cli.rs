//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"TABLES:
  stats    commit_id, file, additions, deletions (one row per file changed by each commit)

EXAMPLES:
  gitsql "SELECT * FROM stats LIMIT 10"
  gitsql "SELECT file, SUM(additions) AS added FROM stats GROUP BY file ORDER BY added DESC"
  gitsql --preset churn-by-file
  gitsql -f json "SELECT commit_id, COUNT(*) AS files FROM stats GROUP BY commit_id"
  echo "SELECT COUNT(*) FROM stats" | gitsql"#;

#[derive(Parser, Debug)]
#[command(name = "gitsql")]
#[command(about = "SQL query engine for Git commit history and diff statistics")]
#[command(version)]
#[command(after_help = AFTER_HELP)]
pub struct Args {
    /// SQL query to execute (read from stdin when omitted and stdin is piped)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Git repository path
    #[arg(short, long, env = "GITSQL_REPO", default_value = ".", global = true)]
    pub repo: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Omit the header row (table, csv and tsv formats)
    #[arg(short = 'H', long, global = true)]
    pub no_header: bool,

    /// Run a named preset query instead of QUERY (see `gitsql examples`)
    #[arg(short, long, conflicts_with = "query")]
    pub preset: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available tables
    Tables,

    /// Show the columns of a table
    Schema {
        /// Table name
        table: String,
    },

    /// List preset queries
    Examples,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
    Jsonl,
}
