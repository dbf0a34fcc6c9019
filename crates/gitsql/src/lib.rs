//! # gitsql
//!
//! Query Git repositories using SQL.
//!
//! gitsql exposes repository history to an embedded SQLite engine through
//! virtual tables. Rows are produced lazily while SQLite scans the table:
//! the history is walked one commit at a time, most recent committer time
//! first, and diff statistics are computed only for the commit under the
//! cursor.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gitsql::{Result, SqlEngine};
//!
//! fn main() -> Result<()> {
//!     let engine = SqlEngine::open(".")?;
//!     let result = engine.execute(
//!         "SELECT file, SUM(additions) AS added FROM stats GROUP BY file ORDER BY added DESC",
//!     )?;
//!
//!     println!("Found {} files", result.row_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Available Tables
//!
//! - **`stats`**: `commit_id`, `file`, `additions`, `deletions`, one row per
//!   file changed by each commit reachable from `HEAD`. Root commits report
//!   every file at its full line count.
//!
//! The `git_stats` module can also be registered on any connection with
//! [`sql::register_module`] and instantiated with
//! `CREATE VIRTUAL TABLE name USING git_stats("/path/to/repo")`.
//!
//! See [`TABLES`] for detailed schema information.

pub mod cli;
pub mod error;
pub mod git;
pub mod output;
pub mod sql;

pub use cli::{Args, Command, OutputFormat};
pub use error::{GitsqlError, Result};
pub use git::{FileStat, GitRepo};
pub use sql::{QueryResult, SqlEngine, TableInfo, TABLES};
