//! Repository access: opening, history traversal and per-commit file statistics.

pub mod history;
mod repository;
pub mod stats;

pub use history::CommitterTimeWalk;
pub use repository::GitRepo;
pub use stats::{FileStat, ParentDiffStats, RootCommitStats, StatsProvider};
