//! Synchronization and status reporting across configured repositories.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use warden_core::test_utils::{RecordingTransport, ScriptedStars};
    use warden_core::{
        GateTiming, GithubLogin, GroupId, MembershipGate, MemoryStore, MessageTemplates,
        RepoName, RepoRouter, UserId, VerificationService,
    };

    fn login(s: &str) -> GithubLogin {
        GithubLogin::parse(s).unwrap()
    }

    fn repo(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    fn multi_repo_service(stars: Arc<ScriptedStars>) -> VerificationService {
        VerificationService::new(
            Arc::new(RecordingTransport::moderator()),
            stars,
            Arc::new(MemoryStore::new()),
            RepoRouter::new(
                Some(repo("octo/default")),
                vec![
                    (GroupId::new("g1"), repo("octo/one")),
                    (GroupId::new("g2"), repo("octo/two")),
                    // Second group governed by an already-routed repo.
                    (GroupId::new("g3"), repo("octo/one")),
                ],
            ),
            MessageTemplates::default(),
            GateTiming {
                verification_window: Duration::from_millis(100),
                grace_period: Duration::from_millis(100),
            },
        )
    }

    #[tokio::test]
    async fn sync_all_covers_each_repo_once() {
        let stars = Arc::new(
            ScriptedStars::new()
                .with_listing(repo("octo/default"), vec![login("d1")])
                .with_listing(repo("octo/one"), vec![login("a1"), login("a2")])
                .with_listing(repo("octo/two"), vec![]),
        );
        let service = multi_repo_service(stars.clone());

        let results = service.sync_all().await;
        assert_eq!(results.len(), 3);
        assert!(results.values().all(|ok| *ok));
        // One fetch per distinct repo, duplicates routed away.
        assert_eq!(stars.fetch_calls(), 3);

        let status = service.repo_status(repo("octo/one")).await;
        assert_eq!(status.member_count, 2);
        assert_eq!(status.claimed_count, 0);
    }

    #[tokio::test]
    async fn repeated_sync_is_stable() {
        let stars = Arc::new(
            ScriptedStars::new().with_listing(repo("octo/default"), vec![login("d1"), login("d2")]),
        );
        let service = multi_repo_service(stars);

        service.sync_repo(repo("octo/default")).await;
        let first = service.repo_status(repo("octo/default")).await;
        service.sync_repo(repo("octo/default")).await;
        let second = service.repo_status(repo("octo/default")).await;
        assert_eq!(first, second);
        assert_eq!(second.member_count, 2);
    }

    #[tokio::test]
    async fn status_counts_follow_bind_and_unbind() {
        let stars = Arc::new(
            ScriptedStars::new().with_listing(repo("octo/default"), vec![login("d1")]),
        );
        let service = multi_repo_service(stars);
        let user = UserId::new("U1");

        service.sync_repo(repo("octo/default")).await;
        service
            .bind_claim(user.clone(), login("d1"), repo("octo/default"))
            .await
            .unwrap();
        assert_eq!(
            service.repo_status(repo("octo/default")).await.claimed_count,
            1
        );

        service
            .unbind_claim(user.clone(), repo("octo/default"))
            .await
            .unwrap();
        assert_eq!(
            service.repo_status(repo("octo/default")).await.claimed_count,
            0
        );
        assert!(service.claims_for(user).await.is_empty());
    }
}
