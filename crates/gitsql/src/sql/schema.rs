//! Table catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnInfo {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub description: &'static str,
}

/// Describes a queryable table and the virtual table module backing it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub module: &'static str,
    pub description: &'static str,
    pub columns: &'static [ColumnInfo],
}

impl TableInfo {
    /// The `CREATE TABLE` statement declared to SQLite for this table.
    pub fn declaration(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type))
            .collect();
        format!("CREATE TABLE x({})", columns.join(", "))
    }
}

pub const STATS_TABLE: TableInfo = TableInfo {
    name: "stats",
    module: "git_stats",
    description: "Lines added and deleted per file for every commit reachable from HEAD",
    columns: &[
        ColumnInfo {
            name: "commit_id",
            sql_type: "TEXT",
            description: "Full commit hash",
        },
        ColumnInfo {
            name: "file",
            sql_type: "TEXT",
            description: "Path of the changed file",
        },
        ColumnInfo {
            name: "additions",
            sql_type: "INTEGER",
            description: "Lines added (full line count for root commits)",
        },
        ColumnInfo {
            name: "deletions",
            sql_type: "INTEGER",
            description: "Lines deleted (0 for root commits)",
        },
    ],
};

pub static TABLES: &[TableInfo] = &[STATS_TABLE];

pub fn get_table_info(name: &str) -> Option<&'static TableInfo> {
    TABLES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
