//! Core records owned by the ledger and the coordinator.

use crate::domain::value_objects::{GroupId, RepoName, UserId};
use serde::{Deserialize, Serialize};

/// Durable row for one observed stargazer of one repository.
///
/// A record is created the first time a login is seen in the repository's
/// star set (bulk sync or direct probe) and is never deleted afterwards;
/// only the claim comes and goes. `claimant` holds the chat member that has
/// proven control of the login for this repository, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingRecord {
    /// Chat member currently claiming this login, if bound.
    pub claimant: Option<UserId>,
    /// Unix seconds when the login was first observed (the star timestamp
    /// when the source reported one).
    pub created_at: i64,
    /// Unix seconds of the last refresh, bind, or unbind.
    pub updated_at: i64,
}

impl BindingRecord {
    /// Fresh unclaimed record.
    pub fn observed(created_at: i64, updated_at: i64) -> Self {
        Self {
            claimant: None,
            created_at,
            updated_at,
        }
    }
}

/// In-flight verification challenge for one chat member.
///
/// Volatile: lives only in the coordinator's pending set. A process restart
/// drops in-flight challenges without touching the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChallenge {
    /// Group the member joined.
    pub group: GroupId,
    /// Repository governing that group.
    pub repo: RepoName,
}
