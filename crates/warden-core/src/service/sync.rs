//! Star-set synchronization.

use crate::domain::value_objects::RepoName;
use crate::service::core::VerificationService;
use std::collections::BTreeMap;
use tracing::{info, warn};

impl VerificationService {
    /// Refresh the ledger's star set for one repository. The fetch itself
    /// never fails (it degrades to a partial listing); the result reflects
    /// whether the ledger accepted the write.
    pub async fn refresh_repo(&self, repo: &RepoName) -> bool {
        let logins = self.stars.fetch_stargazers(repo).await;
        if logins.is_empty() {
            warn!(repo = %repo, "star listing came back empty");
        }
        self.ledger.sync_bulk(&logins, repo)
    }

    /// Refresh every configured repository. Each sync is independent; a
    /// failure in one repository never aborts the others.
    pub async fn refresh_all(&self) -> BTreeMap<RepoName, bool> {
        let mut results = BTreeMap::new();
        for repo in self.router.ordered_repos() {
            let ok = self.refresh_repo(repo).await;
            results.insert(repo.clone(), ok);
        }
        info!(
            repos = results.len(),
            failed = results.values().filter(|ok| !**ok).count(),
            "full star synchronization finished"
        );
        results
    }
}
