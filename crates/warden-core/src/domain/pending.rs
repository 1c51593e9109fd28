//! Pending verification set.
//!
//! One entry per chat member currently mid-verification, keyed by member id.
//! Each entry owns the abort handle of that member's timeout task. The map
//! is the single shared mutable resource of the coordinator: every
//! transition that can finish a verification (success, departure, eviction,
//! replacement) goes through an atomic removal here, so exactly one outcome
//! wins and the losers observe an absent entry and no-op.

use crate::domain::entities::PendingChallenge;
use crate::domain::value_objects::UserId;
use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::debug;

struct PendingEntry {
    challenge: PendingChallenge,
    timeout: AbortHandle,
}

/// Concurrent map of members awaiting verification.
#[derive(Default)]
pub struct PendingSet {
    inner: DashMap<UserId, PendingEntry>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a challenge for `user`, replacing and cancelling any previous
    /// one (duplicate join notices reset the clock).
    pub fn begin(&self, user: UserId, challenge: PendingChallenge, timeout: AbortHandle) {
        if let Some(previous) = self.inner.insert(
            user.clone(),
            PendingEntry { challenge, timeout },
        ) {
            previous.timeout.abort();
            debug!(user = %user, "replaced previous pending challenge");
        }
    }

    /// Snapshot of the member's challenge, if one is pending. The map lock
    /// is released before returning.
    pub fn challenge_of(&self, user: &UserId) -> Option<PendingChallenge> {
        self.inner.get(user).map(|e| e.challenge.clone())
    }

    pub fn contains(&self, user: &UserId) -> bool {
        self.inner.contains_key(user)
    }

    /// Resolve the member's challenge from outside the timeout task:
    /// removes the entry and aborts the task. Safe to call when nothing is
    /// pending or the task already finished; returns whether an entry was
    /// removed.
    pub fn cancel(&self, user: &UserId) -> bool {
        match self.inner.remove(user) {
            Some((_, entry)) => {
                entry.timeout.abort();
                true
            }
            None => false,
        }
    }

    /// Atomically take the entry from inside the timeout task itself. Does
    /// NOT abort the handle (the caller is that task). `None` means another
    /// transition already won and the caller must not act.
    pub fn take(&self, user: &UserId) -> Option<PendingChallenge> {
        self.inner.remove(user).map(|(_, entry)| entry.challenge)
    }

    /// Number of members currently mid-verification.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
