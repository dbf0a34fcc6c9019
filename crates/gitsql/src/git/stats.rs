//! Per-file line statistics for a single commit.
//!
//! A commit's statistics come from one of two providers, picked by parent
//! count: a root commit has nothing to diff against, so every file it
//! contains counts as fully added; any other commit is diffed against its
//! first parent.

use crate::error::{GitsqlError, Result};
use git2::{Commit, Diff, Patch, Repository};
use serde::Serialize;

/// Lines added and removed for one file in one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStat {
    pub path: String,
    pub additions: usize,
    pub deletions: usize,
}

impl FileStat {
    pub fn new(path: impl Into<String>, additions: usize, deletions: usize) -> Self {
        Self {
            path: path.into(),
            additions,
            deletions,
        }
    }
}

/// Computes the file statistics of a commit.
pub trait StatsProvider {
    fn file_stats(&self, repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileStat>>;
}

/// Statistics for a commit without parents: every file at its full line count.
pub struct RootCommitStats;

/// Statistics from a tree diff against the commit's first parent.
pub struct ParentDiffStats;

/// Selects the provider for a commit with `parent_count` parents.
pub fn stats_provider(parent_count: usize) -> Box<dyn StatsProvider> {
    if parent_count == 0 {
        Box::new(RootCommitStats)
    } else {
        Box::new(ParentDiffStats)
    }
}

pub fn commit_file_stats(repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileStat>> {
    stats_provider(commit.parent_count()).file_stats(repo, commit)
}

impl StatsProvider for RootCommitStats {
    fn file_stats(&self, repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileStat>> {
        let tree = commit.tree().map_err(GitsqlError::DiffComputation)?;

        // Diffing against no tree reports every file as fully added.
        let diff = repo
            .diff_tree_to_tree(None, Some(&tree), None)
            .map_err(GitsqlError::DiffComputation)?;
        diff_file_stats(&diff)
    }
}

impl StatsProvider for ParentDiffStats {
    fn file_stats(&self, repo: &Repository, commit: &Commit<'_>) -> Result<Vec<FileStat>> {
        let parent = commit.parent(0).map_err(GitsqlError::DiffComputation)?;
        let parent_tree = parent.tree().map_err(GitsqlError::DiffComputation)?;
        let tree = commit.tree().map_err(GitsqlError::DiffComputation)?;

        let diff = repo
            .diff_tree_to_tree(Some(&parent_tree), Some(&tree), None)
            .map_err(GitsqlError::DiffComputation)?;
        diff_file_stats(&diff)
    }
}

fn diff_file_stats(diff: &Diff<'_>) -> Result<Vec<FileStat>> {
    let count = diff.deltas().len();
    let mut stats = Vec::with_capacity(count);
    for idx in 0..count {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };
        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Binary deltas carry no line information.
        let (additions, deletions) =
            match Patch::from_diff(diff, idx).map_err(GitsqlError::DiffComputation)? {
                Some(patch) => {
                    let (_, additions, deletions) =
                        patch.line_stats().map_err(GitsqlError::DiffComputation)?;
                    (additions, deletions)
                }
                None => (0, 0),
            };

        stats.push(FileStat::new(path, additions, deletions));
    }

    Ok(stats)
}
