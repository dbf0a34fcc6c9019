//! Cursor over (commit, changed file) pairs for the `git_stats` table.

use crate::error::{GitsqlError, Result};
use crate::git::{CommitterTimeWalk, FileStat, GitRepo};
use crate::sql::stats_table::GitStatsTable;
use rusqlite::ffi;
use rusqlite::vtab::{Context, VTabCursor, Values};
use std::marker::PhantomData;
use std::os::raw::c_int;
use std::path::Path;

/// Where a cursor currently is in its scan.
#[derive(Debug)]
enum Position {
    /// Opened but not filtered yet.
    Unpositioned,
    Positioned {
        commit_id: String,
        stats: Vec<FileStat>,
        file_index: usize,
    },
    Exhausted,
}

/// One row of the `stats` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRow<'a> {
    pub commit_id: &'a str,
    pub file: &'a str,
    pub additions: usize,
    pub deletions: usize,
}

/// A single scan of a `git_stats` table.
///
/// Each cursor owns its repository handle and commit walk, so concurrent
/// cursors over the same repository share no mutable state. Statistics are
/// computed one commit at a time as the scan advances.
#[repr(C)]
pub struct GitStatsCursor<'vtab> {
    /// Base class. Must be first.
    base: ffi::sqlite3_vtab_cursor,
    repo: Option<GitRepo>,
    walk: Option<CommitterTimeWalk>,
    position: Position,
    rowid: i64,
    phantom: PhantomData<&'vtab GitStatsTable>,
}

impl GitStatsCursor<'_> {
    /// Opens the repository at `path` for a new scan.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = GitRepo::open(path)?;
        tracing::debug!(path = %repo.path(), "opened git_stats cursor");

        Ok(Self {
            base: ffi::sqlite3_vtab_cursor::default(),
            repo: Some(repo),
            walk: None,
            position: Position::Unpositioned,
            rowid: 0,
            phantom: PhantomData,
        })
    }

    /// Restarts the scan at the history tip, discarding any previous walk.
    pub fn rewind(&mut self) -> Result<()> {
        self.walk = None;
        self.position = Position::Unpositioned;
        self.rowid = 0;

        let repo = self.repo.as_ref().ok_or(GitsqlError::CursorClosed)?;
        let Some(tip) = repo.resolve_tip()? else {
            tracing::debug!("repository has no commits");
            self.position = Position::Exhausted;
            return Ok(());
        };

        tracing::debug!(tip = %tip, "starting history scan");
        self.walk = Some(repo.walk_from(tip)?);
        self.advance_commit()
    }

    /// Moves to the next row.
    pub fn advance(&mut self) -> Result<()> {
        self.rowid += 1;
        if let Position::Positioned {
            stats, file_index, ..
        } = &mut self.position
        {
            if *file_index + 1 < stats.len() {
                *file_index += 1;
                return Ok(());
            }
        }
        self.advance_commit()
    }

    /// Moves to the first file of the next commit that changed any file.
    fn advance_commit(&mut self) -> Result<()> {
        let result = self.load_next_commit();
        if result.is_err() {
            self.walk = None;
            self.position = Position::Exhausted;
        }
        result
    }

    fn load_next_commit(&mut self) -> Result<()> {
        let (Some(repo), Some(walk)) = (self.repo.as_ref(), self.walk.as_mut()) else {
            self.position = Position::Exhausted;
            return Ok(());
        };

        while let Some(commit) = repo.next_commit(walk)? {
            let stats = repo.file_stats(&commit)?;
            if stats.is_empty() {
                tracing::trace!(commit = %commit.id(), "commit changes no files");
                continue;
            }
            tracing::trace!(commit = %commit.id(), files = stats.len(), "advanced to commit");
            self.position = Position::Positioned {
                commit_id: commit.id().to_string(),
                stats,
                file_index: 0,
            };
            return Ok(());
        }

        self.walk = None;
        self.position = Position::Exhausted;
        Ok(())
    }

    /// The row under the cursor, if positioned on one.
    pub fn current(&self) -> Option<StatsRow<'_>> {
        match &self.position {
            Position::Positioned {
                commit_id,
                stats,
                file_index,
            } => stats.get(*file_index).map(|stat| StatsRow {
                commit_id,
                file: &stat.path,
                additions: stat.additions,
                deletions: stat.deletions,
            }),
            Position::Unpositioned | Position::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current().is_none()
    }

    /// Releases the walk and the repository handle. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.repo.is_some() {
            tracing::debug!(rows = self.rowid, "closing git_stats cursor");
        }
        self.walk = None;
        self.repo = None;
        self.position = Position::Exhausted;
    }
}

impl Drop for GitStatsCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

unsafe impl VTabCursor for GitStatsCursor<'_> {
    fn filter(
        &mut self,
        _idx_num: c_int,
        _idx_str: Option<&str>,
        _args: &Values<'_>,
    ) -> rusqlite::Result<()> {
        Ok(self.rewind()?)
    }

    fn next(&mut self) -> rusqlite::Result<()> {
        Ok(self.advance()?)
    }

    fn eof(&self) -> bool {
        self.is_exhausted()
    }

    fn column(&self, ctx: &mut Context, i: c_int) -> rusqlite::Result<()> {
        let row = self.current().ok_or_else(|| {
            rusqlite::Error::ModuleError("git_stats cursor is not positioned on a row".into())
        })?;
        match i {
            0 => ctx.set_result(&row.commit_id),
            1 => ctx.set_result(&row.file),
            2 => ctx.set_result(&(row.additions as i64)),
            3 => ctx.set_result(&(row.deletions as i64)),
            _ => Err(rusqlite::Error::ModuleError(format!(
                "git_stats has no column {i}"
            ))),
        }
    }

    fn rowid(&self) -> rusqlite::Result<i64> {
        Ok(self.rowid)
    }
}
