//! Lazy commit-history traversal ordered by committer time.

use crate::error::{GitsqlError, Result};
use git2::{Commit, Oid, Repository};
use std::collections::{BinaryHeap, HashSet};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    time: i64,
    id: Oid,
}

/// Walks every commit reachable from a tip, most recent committer time first.
///
/// The walk only stores object ids, so it does not borrow the repository and
/// can live next to the handle that owns it. Each step loads a single commit
/// and queues its parents; nothing is read ahead of the caller.
#[derive(Debug)]
pub struct CommitterTimeWalk {
    queue: BinaryHeap<Pending>,
    seen: HashSet<Oid>,
}

impl CommitterTimeWalk {
    pub fn new(repo: &Repository, tip: Oid) -> Result<Self> {
        let commit = repo
            .find_commit(tip)
            .map_err(GitsqlError::HistoryResolution)?;

        let mut walk = Self {
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
        };
        walk.enqueue(&commit);
        Ok(walk)
    }

    fn enqueue(&mut self, commit: &Commit<'_>) {
        if self.seen.insert(commit.id()) {
            self.queue.push(Pending {
                time: commit.time().seconds(),
                id: commit.id(),
            });
        }
    }

    /// Returns the next commit, or `None` once the history is exhausted.
    pub fn next_commit<'r>(&mut self, repo: &'r Repository) -> Result<Option<Commit<'r>>> {
        let Some(pending) = self.queue.pop() else {
            return Ok(None);
        };

        let commit = repo
            .find_commit(pending.id)
            .map_err(GitsqlError::HistoryResolution)?;

        for parent_id in commit.parent_ids() {
            if self.seen.contains(&parent_id) {
                continue;
            }
            let parent = repo
                .find_commit(parent_id)
                .map_err(GitsqlError::HistoryResolution)?;
            self.enqueue(&parent);
        }

        Ok(Some(commit))
    }

    /// Whether any commits remain to be visited.
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }
}
