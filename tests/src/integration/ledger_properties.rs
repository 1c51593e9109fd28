//! Binding invariants checked against both store adapters.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use tempfile::TempDir;
    use warden_core::{GithubLogin, KeyValueStore, Ledger, MemoryStore, RepoName, UserId};
    use warden_runtime::{RocksConfig, RocksStore};

    fn login(s: &str) -> GithubLogin {
        GithubLogin::parse(s).unwrap()
    }

    fn repo(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    /// Run the full invariant suite against one substrate.
    fn check_binding_invariants(store: Arc<dyn KeyValueStore>) {
        let ledger = Ledger::new(store);
        let r = repo("octo/repo");
        let (u1, u2) = (UserId::new("U123"), UserId::new("U456"));

        // Scenario: alice arrives via bulk sync.
        assert!(ledger.sync_bulk(&[login("alice"), login("bob")], &r));
        assert!(ledger.is_member(&login("alice"), &r));

        // bind then reverse lookup.
        assert!(ledger.bind(&login("alice"), &u1, &r));
        assert_eq!(ledger.claimant_of(&u1, &r), Some(login("alice")));
        assert_eq!(ledger.claim_owner(&login("alice"), &r), Some(u1.clone()));

        // A different claimant is rejected without changing state.
        assert!(!ledger.bind(&login("alice"), &u2, &r));
        assert_eq!(ledger.claim_owner(&login("alice"), &r), Some(u1.clone()));

        // Idempotent re-bind of the same pair.
        assert!(ledger.bind(&login("alice"), &u1, &r));

        // One claim per user per repo.
        assert!(!ledger.bind(&login("bob"), &u1, &r));

        // Re-sync never clears the claim.
        assert!(ledger.sync_bulk(&[login("alice"), login("bob")], &r));
        assert_eq!(ledger.claim_owner(&login("alice"), &r), Some(u1.clone()));
        assert_eq!(ledger.member_count(&r), 2);

        // Unbind clears the claim, keeps the row, and is a no-op afterwards.
        assert!(ledger.unbind(&u1, &r));
        assert_eq!(ledger.claimant_of(&u1, &r), None);
        assert!(ledger.is_member(&login("alice"), &r));
        assert!(!ledger.unbind(&u1, &r));
    }

    #[test]
    fn invariants_hold_on_memory_store() {
        check_binding_invariants(Arc::new(MemoryStore::new()));
    }

    #[test]
    fn invariants_hold_on_rocksdb() {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(RocksConfig::for_testing(
            dir.path().to_string_lossy().to_string(),
        ))
        .unwrap();
        check_binding_invariants(Arc::new(store));
    }

    #[test]
    fn claims_survive_store_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let r = repo("octo/repo");

        {
            let store = Arc::new(RocksStore::open(RocksConfig::for_testing(path.clone())).unwrap());
            let ledger = Ledger::new(store);
            ledger.sync_bulk(&[login("alice")], &r);
            assert!(ledger.bind(&login("alice"), &UserId::new("U1"), &r));
        }

        let store = Arc::new(RocksStore::open(RocksConfig::for_testing(path)).unwrap());
        let ledger = Ledger::new(store);
        assert!(ledger.is_member(&login("alice"), &r));
        assert_eq!(ledger.claimant_of(&UserId::new("U1"), &r), Some(login("alice")));
    }

    #[test]
    fn concurrent_binds_for_one_user_yield_one_claim() {
        let ledger = Arc::new(Ledger::new(Arc::new(MemoryStore::new())));
        let r = repo("octo/repo");
        let logins: Vec<GithubLogin> = (0..8).map(|i| login(&format!("login{i}"))).collect();
        assert!(ledger.sync_bulk(&logins, &r));

        let user = UserId::new("U1");
        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = logins
                .iter()
                .map(|l| {
                    let ledger = Arc::clone(&ledger);
                    let user = user.clone();
                    let r = r.clone();
                    scope.spawn(move || ledger.bind(l, &user, &r) as usize)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(successes, 1);
        assert!(ledger.claimant_of(&user, &r).is_some());
        assert_eq!(ledger.claimed_count(&r), 1);
    }

    #[test]
    fn concurrent_claimants_for_one_login_yield_one_owner() {
        let ledger = Arc::new(Ledger::new(Arc::new(MemoryStore::new())));
        let r = repo("octo/repo");
        assert!(ledger.sync_bulk(&[login("alice")], &r));

        let successes: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let ledger = Arc::clone(&ledger);
                    let r = r.clone();
                    scope.spawn(move || {
                        ledger.bind(&login("alice"), &UserId::new(format!("U{i}")), &r) as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(successes, 1);
        assert!(ledger.claim_owner(&login("alice"), &r).is_some());
    }
}
