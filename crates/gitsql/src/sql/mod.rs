//! SQLite virtual tables over repository history.

mod engine;
pub mod presets;
pub mod schema;
pub mod stats_cursor;
pub mod stats_table;

pub use engine::{QueryResult, SqlEngine};
pub use presets::{find_preset, Preset, PRESETS};
pub use schema::{get_table_info, ColumnInfo, TableInfo, STATS_TABLE, TABLES};
pub use stats_cursor::{GitStatsCursor, StatsRow};
pub use stats_table::{register_module, GitStatsTable, MODULE_NAME};
