//! Driving port (inbound API).
//!
//! The surface external callers invoke on the gate: membership events from
//! the chat platform, sync triggers, and the admin claim operations.

use crate::domain::errors::Rejection;
use crate::domain::value_objects::{GithubLogin, GroupId, RepoName, UserId};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// An inbound group message, as delivered by the chat transport.
///
/// `text` arrives with platform mention markup already stripped; `mentions`
/// lists the member ids the message @-mentioned.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub group: GroupId,
    pub sender: UserId,
    pub text: String,
    pub mentions: Vec<UserId>,
}

/// Per-repository membership statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoStatus {
    /// Known stargazers in the ledger.
    pub member_count: u64,
    /// Stargazers currently claimed by a chat member.
    pub claimed_count: u64,
}

/// The verification gate's exposed operations.
#[async_trait]
pub trait MembershipGate: Send + Sync {
    /// A member joined a managed group. Issues a challenge unless the gate
    /// lacks moderation privilege, no repository routes to the group, or
    /// the member already holds a bound claim.
    async fn admit(&self, group: GroupId, user: UserId);

    /// A group message arrived. Only messages from pending members that
    /// mention the bot participate in verification.
    async fn handle_message(&self, message: InboundMessage);

    /// A member left. Abandons any pending challenge without a removal
    /// action.
    async fn handle_departure(&self, user: UserId);

    /// Refresh the ledger's star set for one repository from the source.
    async fn sync_repo(&self, repo: RepoName) -> bool;

    /// Refresh every configured repository independently; one failure does
    /// not abort the others.
    async fn sync_all(&self) -> BTreeMap<RepoName, bool>;

    /// Administratively bind `login` to `user` for `repo`.
    async fn bind_claim(
        &self,
        user: UserId,
        login: GithubLogin,
        repo: RepoName,
    ) -> Result<(), Rejection>;

    /// Release the claim `user` holds for `repo`; returns the released
    /// login.
    async fn unbind_claim(&self, user: UserId, repo: RepoName) -> Result<GithubLogin, Rejection>;

    /// Membership statistics for one repository.
    async fn repo_status(&self, repo: RepoName) -> RepoStatus;

    /// Repositories where `user` holds a claim: the configured default
    /// first, then routed repositories in configuration order, then any
    /// remainder lexicographically.
    async fn claims_for(&self, user: UserId) -> Vec<RepoName>;
}
