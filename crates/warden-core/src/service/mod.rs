//! Service layer: wires the domain to the ports.
//!
//! [`VerificationService`] is the coordinator; [`Ledger`] adjudicates
//! bind/unbind decisions over the key-value substrate. The inbound
//! [`MembershipGate`] port is implemented here by delegation to the
//! inherent methods in `events`, `sync`, and `api`.

mod api;
mod core;
mod events;
mod ledger;
mod sync;

pub use core::{GateTiming, VerificationService};
pub use ledger::Ledger;

use crate::domain::errors::Rejection;
use crate::domain::value_objects::{GithubLogin, GroupId, RepoName, UserId};
use crate::ports::inbound::{InboundMessage, MembershipGate, RepoStatus};
use async_trait::async_trait;
use std::collections::BTreeMap;

#[async_trait]
impl MembershipGate for VerificationService {
    async fn admit(&self, group: GroupId, user: UserId) {
        self.on_join(group, user).await;
    }

    async fn handle_message(&self, message: InboundMessage) {
        self.on_message(message).await;
    }

    async fn handle_departure(&self, user: UserId) {
        self.on_departure(user).await;
    }

    async fn sync_repo(&self, repo: RepoName) -> bool {
        self.refresh_repo(&repo).await
    }

    async fn sync_all(&self) -> BTreeMap<RepoName, bool> {
        self.refresh_all().await
    }

    async fn bind_claim(
        &self,
        user: UserId,
        login: GithubLogin,
        repo: RepoName,
    ) -> Result<(), Rejection> {
        VerificationService::register_claim(self, &user, &login, &repo)
    }

    async fn unbind_claim(&self, user: UserId, repo: RepoName) -> Result<GithubLogin, Rejection> {
        VerificationService::release_claim(self, &user, &repo)
    }

    async fn repo_status(&self, repo: RepoName) -> RepoStatus {
        self.status_of(&repo)
    }

    async fn claims_for(&self, user: UserId) -> Vec<RepoName> {
        self.claimed_repos(&user)
    }
}
