//! Administrative claim operations and status reporting.
//!
//! These mirror the verification flow's policy checks but stay entirely on
//! the ledger: the admin path never probes the network, so a login must
//! already be in the synchronized star set to be bound here.

use crate::domain::errors::Rejection;
use crate::domain::value_objects::{GithubLogin, RepoName, UserId};
use crate::ports::inbound::RepoStatus;
use crate::service::core::VerificationService;
use tracing::info;

impl VerificationService {
    /// Bind `login` to `user` for `repo`, with every policy reject surfaced
    /// as a typed reason. Re-binding the pair already held is accepted.
    pub fn register_claim(
        &self,
        user: &UserId,
        login: &GithubLogin,
        repo: &RepoName,
    ) -> Result<(), Rejection> {
        if let Some(existing) = self.ledger.claimant_of(user, repo) {
            if existing != *login {
                return Err(Rejection::AlreadyBound {
                    login: existing,
                    repo: repo.clone(),
                });
            }
        }
        if !self.ledger.is_member(login, repo) {
            return Err(Rejection::NotAStargazer {
                login: login.clone(),
                repo: repo.clone(),
            });
        }
        if let Some(owner) = self.ledger.claim_owner(login, repo) {
            if owner != *user {
                return Err(Rejection::LoginAlreadyClaimed {
                    login: login.clone(),
                });
            }
        }
        if !self.ledger.bind(login, user, repo) {
            return Err(Rejection::BindFailed);
        }
        info!(user = %user, login = %login, repo = %repo, "claim bound");
        Ok(())
    }

    /// Release the claim `user` holds for `repo`, reporting which login was
    /// released.
    pub fn release_claim(&self, user: &UserId, repo: &RepoName) -> Result<GithubLogin, Rejection> {
        let login = self
            .ledger
            .claimant_of(user, repo)
            .ok_or_else(|| Rejection::NothingBound { repo: repo.clone() })?;
        if !self.ledger.unbind(user, repo) {
            return Err(Rejection::NothingBound { repo: repo.clone() });
        }
        info!(user = %user, login = %login, repo = %repo, "claim released");
        Ok(login)
    }

    /// Member and claim counts for one repository.
    pub fn status_of(&self, repo: &RepoName) -> RepoStatus {
        RepoStatus {
            member_count: self.ledger.member_count(repo),
            claimed_count: self.ledger.claimed_count(repo),
        }
    }

    /// Repositories where `user` holds a claim, in presentation order:
    /// configured default first, then routed repositories in configuration
    /// order, then any remaining claims lexicographically.
    pub fn claimed_repos(&self, user: &UserId) -> Vec<RepoName> {
        let claimed = self.ledger.claimed_repos_for(user);
        let mut ordered = Vec::with_capacity(claimed.len());
        for repo in self.router.ordered_repos() {
            if claimed.contains(repo) && !ordered.contains(repo) {
                ordered.push(repo.clone());
            }
        }
        for repo in claimed {
            if !ordered.contains(&repo) {
                ordered.push(repo);
            }
        }
        ordered
    }
}
