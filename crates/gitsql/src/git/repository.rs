//! Git repository wrapper for gitsql.

use crate::error::{GitsqlError, Result};
use crate::git::history::CommitterTimeWalk;
use crate::git::stats::{commit_file_stats, FileStat};
use git2::{Commit, ErrorCode, Oid, Repository};
use std::path::Path;

/// A read-only handle on a Git repository.
///
/// `GitRepo` handles repository discovery and exposes the pieces the
/// `git_stats` virtual table needs: tip resolution, a committer-time
/// history walk and per-commit file statistics.
///
/// # Example
///
/// ```no_run
/// use gitsql::GitRepo;
///
/// let repo = GitRepo::open(".")?;
/// println!("Repository at: {}", repo.path());
/// # Ok::<(), gitsql::GitsqlError>(())
/// ```
pub struct GitRepo {
    repo: Repository,
    path: String,
}

impl GitRepo {
    /// Opens a Git repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// supporting nested directories within a repository.
    ///
    /// # Errors
    ///
    /// Returns `GitsqlError::RepoNotFound` if no Git repository is found and
    /// `GitsqlError::RepositoryOpen` if one is found but cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let repo = Repository::discover(path_ref).map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitsqlError::RepoNotFound(path_ref.display().to_string())
            } else {
                GitsqlError::RepositoryOpen {
                    path: path_ref.display().to_string(),
                    source: e,
                }
            }
        })?;

        let workdir = repo
            .workdir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| repo.path().display().to_string());

        tracing::debug!(path = %workdir, "opened repository");

        Ok(Self {
            repo,
            path: workdir,
        })
    }

    /// Returns the working directory path of the repository, or the git
    /// directory for bare repositories.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolves the commit HEAD points at.
    ///
    /// Returns `Ok(None)` for a repository without commits (unborn HEAD),
    /// which callers treat as an empty history rather than a failure.
    pub fn resolve_tip(&self) -> Result<Option<Oid>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None);
            }
            Err(e) => return Err(GitsqlError::HistoryResolution(e)),
        };

        let commit = head
            .peel_to_commit()
            .map_err(GitsqlError::HistoryResolution)?;
        Ok(Some(commit.id()))
    }

    /// Starts a committer-time ordered walk from `tip`.
    pub fn walk_from(&self, tip: Oid) -> Result<CommitterTimeWalk> {
        CommitterTimeWalk::new(&self.repo, tip)
    }

    /// Pops the next commit off `walk`, resolved against this repository.
    pub fn next_commit(&self, walk: &mut CommitterTimeWalk) -> Result<Option<Commit<'_>>> {
        walk.next_commit(&self.repo)
    }

    /// Per-file line statistics for `commit`; see [`crate::git::stats`].
    pub fn file_stats(&self, commit: &Commit<'_>) -> Result<Vec<FileStat>> {
        commit_file_stats(&self.repo, commit)
    }
}
