//! Named queries over the `stats` table.

use crate::error::{GitsqlError, Result};

#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub sql: &'static str,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "churn-by-file",
        description: "Files with the most lines added and deleted",
        sql: "SELECT file, SUM(additions) AS additions, SUM(deletions) AS deletions, \
              SUM(additions + deletions) AS churn \
              FROM stats GROUP BY file ORDER BY churn DESC LIMIT 20",
    },
    Preset {
        name: "churn-by-commit",
        description: "Commits touching the most lines",
        sql: "SELECT commit_id, COUNT(*) AS files, SUM(additions) AS additions, \
              SUM(deletions) AS deletions \
              FROM stats GROUP BY commit_id ORDER BY additions + deletions DESC LIMIT 20",
    },
    Preset {
        name: "most-changed-files",
        description: "Files changed in the most commits",
        sql: "SELECT file, COUNT(DISTINCT commit_id) AS commits \
              FROM stats GROUP BY file ORDER BY commits DESC LIMIT 20",
    },
    Preset {
        name: "totals",
        description: "Overall commit, file and line totals",
        sql: "SELECT COUNT(DISTINCT commit_id) AS commits, COUNT(DISTINCT file) AS files, \
              SUM(additions) AS additions, SUM(deletions) AS deletions FROM stats",
    },
];

pub fn find_preset(name: &str) -> Result<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| GitsqlError::UnknownPreset(name.to_string()))
}
