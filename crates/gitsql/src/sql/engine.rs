//! SQL query engine for Git repositories.

use crate::error::Result;
use crate::git::GitRepo;
use crate::sql::schema::STATS_TABLE;
use crate::sql::stats_table::{quote_arg, register_module};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use serde_json::{Map, Value};
use std::path::Path;

/// The SQL query engine that executes queries against Git repository data.
///
/// `SqlEngine` owns an in-memory SQLite connection with the `git_stats`
/// module registered and a `stats` virtual table bound to one repository.
/// Rows are produced lazily by the virtual table as SQLite scans it.
///
/// # Example
///
/// ```no_run
/// use gitsql::SqlEngine;
///
/// let engine = SqlEngine::open(".")?;
/// let result = engine.execute("SELECT file, additions FROM stats LIMIT 10")?;
/// println!("Columns: {:?}", result.columns);
/// # Ok::<(), gitsql::GitsqlError>(())
/// ```
pub struct SqlEngine {
    conn: Connection,
    repo_path: String,
}

impl SqlEngine {
    /// Creates an engine over the repository containing `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitsqlError::RepoNotFound` if `path` is not inside a repository.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = GitRepo::open(path)?;
        let repo_path = repo.path().to_string();

        let conn = Connection::open_in_memory()?;
        register_module(&conn)?;
        conn.execute_batch(&format!(
            "CREATE VIRTUAL TABLE {} USING {}({})",
            STATS_TABLE.name,
            STATS_TABLE.module,
            quote_arg(&repo_path)
        ))?;

        tracing::debug!(path = %repo_path, "sql engine ready");

        Ok(Self { conn, repo_path })
    }

    /// Path of the repository the tables read from.
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// Executes a SQL query and returns the results.
    ///
    /// The query can use any SQL features supported by SQLite, including JOINs,
    /// CTEs, window functions, and aggregations. The first error raised while
    /// stepping through rows aborts the query.
    pub fn execute(&self, query: &str) -> Result<QueryResult> {
        let mut stmt = self.conn.prepare(query)?;

        let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let rows = stmt
            .query_map([], |row| row_to_values(row, column_names.len()))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(QueryResult {
            columns: column_names,
            rows,
        })
    }
}

fn row_to_values(row: &Row, col_count: usize) -> rusqlite::Result<Vec<Value>> {
    (0..col_count)
        .map(|i| {
            Ok(match row.get_ref(i)? {
                ValueRef::Null => Value::Null,
                ValueRef::Integer(n) => Value::Number(n.into()),
                ValueRef::Real(n) => serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string())),
                ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).into_owned()),
                ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
            })
        })
        .collect()
}

/// The result of a SQL query execution.
#[derive(Debug)]
pub struct QueryResult {
    /// Column names from the query.
    pub columns: Vec<String>,
    /// Row data as JSON values.
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Returns true if the result contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Converts the result to a JSON array of objects.
    ///
    /// Each row becomes a JSON object with column names as keys.
    pub fn to_json_array(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (i, col) in self.columns.iter().enumerate() {
                    obj.insert(col.clone(), row.get(i).cloned().unwrap_or(Value::Null));
                }
                Value::Object(obj)
            })
            .collect()
    }
}
