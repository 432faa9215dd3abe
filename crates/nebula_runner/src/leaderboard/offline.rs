//! Offline queue and the resilient submitter built on it
//!
//! When the remote leaderboard cannot be reached, finished runs are parked in
//! an [`OfflineQueue`] and mirrored into a local leaderboard so they can still
//! be shown. [`ResilientSubmitter::sync`] replays the queue in order later.

use super::local::LocalLeaderboard;
use super::port::{LeaderboardQuery, PortError, ScoreSubmissionPort};
use super::submission::{HealthStatus, LeaderboardEntry, PlayerStats, ScoreSubmission, SubmissionReceipt};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Entries the local mirror keeps
pub const LOCAL_MIRROR_CAPACITY: usize = 50;

/// Submissions waiting for the remote leaderboard
#[derive(Debug, Default)]
pub struct OfflineQueue {
    pending: VecDeque<ScoreSubmission>,
    path: Option<PathBuf>,
}

impl OfflineQueue {
    /// In-memory queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue persisted as JSON at `path`; restores existing contents
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PortError> {
        let path = path.into();
        let pending = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            VecDeque::new()
        };
        if !pending.is_empty() {
            log::info!("Restored {} offline submissions from {:?}", pending.len(), path);
        }
        Ok(Self { pending, path: Some(path) })
    }

    /// Like [`open`](Self::open), but a file that cannot be read is moved aside
    /// to `<path>.corrupt` and an empty queue takes its place
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(queue) => queue,
            Err(e) => {
                log::warn!("Starting with an empty offline queue, could not read {:?}: {}", path, e);
                let mut aside = path.clone().into_os_string();
                aside.push(".corrupt");
                if let Err(e) = std::fs::rename(&path, &aside) {
                    log::warn!("Could not move {:?} aside: {}", path, e);
                }
                Self { pending: VecDeque::new(), path: Some(path) }
            }
        }
    }

    /// Append a submission
    pub fn push(&mut self, submission: ScoreSubmission) {
        self.pending.push_back(submission);
    }

    /// Take every pending submission, oldest first
    pub fn take_all(&mut self) -> Vec<ScoreSubmission> {
        self.pending.drain(..).collect()
    }

    /// Write the queue to its file, if it has one
    pub fn persist(&self) -> Result<(), PortError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_json(path, &self.pending)
    }

    /// Pending submissions, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ScoreSubmission> {
        self.pending.iter()
    }

    /// Number of pending submissions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Backing file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn write_json(path: &Path, pending: &VecDeque<ScoreSubmission>) -> Result<(), PortError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(pending)?)?;
    Ok(())
}

/// Outcome of a [`ResilientSubmitter::sync`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Accepted by the remote
    pub sent: usize,
    /// Failed again and went back to the queue
    pub requeued: usize,
    /// Rejected by the remote and dropped
    pub dropped: usize,
}

/// Port wrapper that never loses a valid score
///
/// Recoverable remote failures park the run in the offline queue and the
/// local mirror, and the caller gets an offline receipt instead of an error.
#[derive(Debug)]
pub struct ResilientSubmitter<P> {
    remote: P,
    queue: OfflineQueue,
    local: LocalLeaderboard,
}

impl<P: ScoreSubmissionPort> ResilientSubmitter<P> {
    /// Wrap `remote` with an in-memory queue
    pub fn new(remote: P) -> Self {
        Self::with_queue(remote, OfflineQueue::new())
    }

    /// Wrap `remote` with an existing queue
    pub fn with_queue(remote: P, queue: OfflineQueue) -> Self {
        let mut local = LocalLeaderboard::with_capacity(LOCAL_MIRROR_CAPACITY);
        for submission in queue.iter() {
            local.record(LeaderboardEntry::from(submission));
        }
        Self { remote, queue, local }
    }

    /// Replay queued submissions in order
    ///
    /// Runs that fail recoverably again are queued again; runs the remote
    /// rejects are dropped.
    pub fn sync(&mut self) -> SyncReport {
        let mut report = SyncReport::default();
        for submission in self.queue.take_all() {
            match self.remote.submit(&submission) {
                Ok(_) => report.sent += 1,
                Err(e) if e.is_recoverable() => {
                    log::debug!("Sync of '{}' failed again: {}", submission.player_name, e);
                    self.queue.push(submission);
                    report.requeued += 1;
                }
                Err(e) => {
                    log::warn!("Dropping offline score for '{}': {}", submission.player_name, e);
                    report.dropped += 1;
                }
            }
        }

        if report != SyncReport::default() {
            log::info!(
                "Offline sync: {} sent, {} requeued, {} dropped",
                report.sent,
                report.requeued,
                report.dropped
            );
        }
        self.persist_queue();
        report
    }

    fn persist_queue(&self) {
        if let Err(e) = self.queue.persist() {
            log::warn!("Could not persist offline queue: {}", e);
        }
    }

    /// The wrapped remote
    pub fn remote(&self) -> &P {
        &self.remote
    }

    /// The wrapped remote, mutably
    pub fn remote_mut(&mut self) -> &mut P {
        &mut self.remote
    }

    /// Pending submissions
    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    /// Local mirror of offline runs
    pub fn local(&self) -> &LocalLeaderboard {
        &self.local
    }
}

impl<P: ScoreSubmissionPort> ScoreSubmissionPort for ResilientSubmitter<P> {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<SubmissionReceipt, PortError> {
        submission.validate()?;

        match self.remote.submit(submission) {
            Ok(receipt) => Ok(receipt),
            Err(e) if e.is_recoverable() => {
                log::warn!("Leaderboard unavailable, saving score offline: {}", e);
                let entry = LeaderboardEntry::from(submission);
                self.local.record(entry.clone());
                self.queue.push(submission.clone());
                self.persist_queue();
                Ok(SubmissionReceipt { entry, rank: None, offline: true })
            }
            Err(e) => Err(e),
        }
    }

    fn top(&self, query: &LeaderboardQuery) -> Result<Vec<LeaderboardEntry>, PortError> {
        self.remote.top(query).or_else(|e| {
            log::debug!("Showing local leaderboard: {}", e);
            self.local.top(query)
        })
    }

    fn player_stats(&self, player_name: &str) -> Result<PlayerStats, PortError> {
        self.remote.player_stats(player_name)
    }

    fn health(&self) -> Result<HealthStatus, PortError> {
        self.remote.health()
    }
}
