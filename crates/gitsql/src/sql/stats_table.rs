//! The `git_stats` virtual table module.
//!
//! ```sql
//! CREATE VIRTUAL TABLE stats USING git_stats("/path/to/repo");
//! SELECT * FROM stats WHERE file LIKE 'src/%';
//! ```
//!
//! The module declares a fixed schema (see [`STATS_TABLE`]) and hands each
//! scan to a [`GitStatsCursor`] owning its own repository handle.

use crate::error::GitsqlError;
use crate::sql::schema::STATS_TABLE;
use crate::sql::stats_cursor::GitStatsCursor;
use rusqlite::vtab::{
    read_only_module, CreateVTab, IndexInfo, VTab, VTabConnection, VTabKind,
};
use rusqlite::{ffi, Connection};
use std::borrow::Cow;
use std::path::PathBuf;

/// Name the module is registered under.
pub const MODULE_NAME: &str = "git_stats";

// Module arguments follow the module, database and table names.
const PATH_ARG: usize = 3;

// Every scan walks the full history.
const FULL_SCAN_COST: f64 = 1_000_000.0;

/// Registers the `git_stats` module on `conn`.
pub fn register_module(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_module(MODULE_NAME, read_only_module::<GitStatsTable>(), None)
}

/// A `git_stats` table bound to one repository path.
#[repr(C)]
pub struct GitStatsTable {
    /// Base class. Must be first.
    base: ffi::sqlite3_vtab,
    repo_path: PathBuf,
}

unsafe impl<'vtab> VTab<'vtab> for GitStatsTable {
    type Aux = ();
    type Cursor = GitStatsCursor<'vtab>;

    fn connect(
        _db: &mut VTabConnection,
        _aux: Option<&()>,
        args: &[&[u8]],
    ) -> rusqlite::Result<(String, Self)> {
        let repo_path = repo_path_arg(args)?;
        tracing::debug!(path = %repo_path.display(), "connected git_stats table");

        let table = GitStatsTable {
            base: ffi::sqlite3_vtab::default(),
            repo_path,
        };
        Ok((STATS_TABLE.declaration(), table))
    }

    fn best_index(&self, info: &mut IndexInfo) -> rusqlite::Result<()> {
        // Constraints are left for SQLite to evaluate on every row.
        tracing::trace!(
            constraints = info.constraints().count(),
            "git_stats best_index: full scan"
        );
        info.set_estimated_cost(FULL_SCAN_COST);
        Ok(())
    }

    fn open(&'vtab mut self) -> rusqlite::Result<GitStatsCursor<'vtab>> {
        Ok(GitStatsCursor::open(&self.repo_path)?)
    }
}

impl CreateVTab<'_> for GitStatsTable {
    const KIND: VTabKind = VTabKind::Default;
}

/// Extracts the repository path from the module arguments.
pub(crate) fn repo_path_arg(args: &[&[u8]]) -> Result<PathBuf, GitsqlError> {
    let raw = args.get(PATH_ARG).ok_or_else(|| {
        GitsqlError::SchemaDeclaration(format!(
            "{MODULE_NAME} requires a repository path argument"
        ))
    })?;
    let raw = std::str::from_utf8(raw).map_err(|e| {
        GitsqlError::SchemaDeclaration(format!("repository path is not valid UTF-8: {e}"))
    })?;

    if args.len() > PATH_ARG + 1 {
        tracing::debug!(extra = args.len() - PATH_ARG - 1, "ignoring extra module arguments");
    }

    let path = strip_quotes(raw.trim());
    if path.is_empty() {
        return Err(GitsqlError::SchemaDeclaration(
            "repository path argument is empty".to_string(),
        ));
    }
    Ok(PathBuf::from(path.into_owned()))
}

/// SQL-style dequoting: a value enclosed in matching `"` or `'` loses the
/// enclosing pair, and each doubled quote character inside becomes a single
/// one. Anything else is returned as is.
pub fn strip_quotes(arg: &str) -> Cow<'_, str> {
    let bytes = arg.as_bytes();
    if bytes.len() < 2 {
        return Cow::Borrowed(arg);
    }
    let quote = bytes[0];
    if (quote != b'"' && quote != b'\'') || bytes[bytes.len() - 1] != quote {
        return Cow::Borrowed(arg);
    }

    let inner = &arg[1..arg.len() - 1];
    let q = quote as char;
    let doubled = format!("{q}{q}");
    if inner.contains(&doubled) {
        Cow::Owned(inner.replace(&doubled, &q.to_string()))
    } else {
        Cow::Borrowed(inner)
    }
}

/// Quotes `path` as a module argument that [`strip_quotes`] reverses.
pub fn quote_arg(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}
