//! Driven ports (outbound SPI).
//!
//! Interfaces the verification gate requires its host to implement: the
//! chat platform, the star-graph source, and the persistence substrate.

use crate::domain::errors::{StoreError, TransportError};
use crate::domain::value_objects::{GithubLogin, GroupId, Privilege, RepoName, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Chat platform operations the gate depends on.
///
/// Implementations must be `Send + Sync`; every method may be called from
/// concurrent tasks.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// The bot's own member id, used to filter @-mentions.
    fn self_id(&self) -> UserId;

    /// Platform-specific @-mention markup for a member, substituted into
    /// message templates.
    fn mention(&self, user: &UserId) -> String;

    /// Deliver a message into a group.
    async fn send_message(&self, group: &GroupId, text: &str) -> Result<(), TransportError>;

    /// Remove a member from a group.
    async fn remove_member(&self, group: &GroupId, user: &UserId) -> Result<(), TransportError>;

    /// Display name of a member. Callers fall back to the raw id on error.
    async fn member_display_name(
        &self,
        group: &GroupId,
        user: &UserId,
    ) -> Result<String, TransportError>;

    /// The bot's own privilege level in a group.
    async fn self_privilege(&self, group: &GroupId) -> Result<Privilege, TransportError>;
}

/// Result of probing one login's starred listing for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarProbe {
    /// Whether the target repository appeared in the listing.
    pub starred: bool,
    /// Star timestamp when the source reported one.
    pub starred_at: Option<DateTime<Utc>>,
}

impl StarProbe {
    pub fn miss() -> Self {
        Self {
            starred: false,
            starred_at: None,
        }
    }

    pub fn hit(starred_at: Option<DateTime<Utc>>) -> Self {
        Self {
            starred: true,
            starred_at,
        }
    }
}

/// External star-graph source.
///
/// Both operations absorb their own failures: a fetch degrades to whatever
/// was accumulated before the failure (possibly nothing) and a probe
/// degrades to a miss, each with the reason logged. Neither returns an
/// error to the caller.
#[async_trait]
pub trait StarSource: Send + Sync {
    /// All stargazers of `repo`, possibly partial under rate limits or
    /// server errors.
    async fn fetch_stargazers(&self, repo: &RepoName) -> Vec<GithubLogin>;

    /// Whether `login` has starred `repo`, checked against the login's own
    /// starred listing.
    async fn probe_star(&self, login: &GithubLogin, repo: &RepoName) -> StarProbe;
}

/// One mutation in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::Delete { key: key.into() }
    }
}

/// Persistence substrate for the ledger.
///
/// Plain key-value semantics plus an atomic multi-key batch and an ordered
/// prefix scan. Implementations serialize individual operations; the
/// ledger layers its own lock on top for check-then-write sequences.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    fn exists(&self, key: &[u8]) -> Result<bool, StoreError>;

    /// Apply all operations or none.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), StoreError>;

    /// All pairs whose key starts with `prefix`, in key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;
}
