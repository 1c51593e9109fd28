//! Error taxonomy for the verification gate.
//!
//! Three families with different propagation rules:
//!
//! - [`Rejection`]: policy outcomes surfaced to the member as chat replies,
//!   never logged as system errors; state is left unchanged so the member
//!   may retry.
//! - [`StoreError`]: persistence substrate failures. The ledger translates
//!   these into safe defaults (false / none / zero) at its public surface
//!   and logs the cause.
//! - [`TransportError`]: chat platform failures. Event handlers degrade
//!   these to logged no-ops.

use crate::domain::value_objects::{GithubLogin, RepoName};
use thiserror::Error;

/// User-visible policy rejection. Leaves all verification state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The login has not starred the governing repository.
    #[error("{login} has not starred {repo}")]
    NotAStargazer { login: GithubLogin, repo: RepoName },
    /// The login is already claimed by a different member.
    #[error("{login} is already claimed by another member")]
    LoginAlreadyClaimed { login: GithubLogin },
    /// The member already claims a different login for this repository.
    #[error("a different login ({login}) is already bound for {repo}")]
    AlreadyBound { login: GithubLogin, repo: RepoName },
    /// A concurrent bind won the race, or the store could not confirm the
    /// write; the member should retry.
    #[error("binding could not be completed, try again later")]
    BindFailed,
    /// Unbind requested with no claim held.
    #[error("no login is bound for {repo}")]
    NothingBound { repo: RepoName },
}

/// Failure inside the persistence substrate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not serve the operation.
    #[error("store operation failed: {0}")]
    Io(String),
    /// A stored value could not be decoded.
    #[error("stored record could not be decoded: {0}")]
    Codec(String),
}

/// Failure while talking to the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The platform could not be reached.
    #[error("chat transport unavailable: {0}")]
    Unavailable(String),
    /// The platform refused the action.
    #[error("chat platform rejected the action: {0}")]
    Rejected(String),
}
