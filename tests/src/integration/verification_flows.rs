//! End-to-end verification flows through the `MembershipGate` surface.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use warden_core::test_utils::{RecordingTransport, ScriptedStars};
    use warden_core::{
        GateTiming, GithubLogin, GroupId, InboundMessage, MembershipGate, MemoryStore,
        MessageTemplates, RepoName, RepoRouter, UserId, VerificationService,
    };

    fn login(s: &str) -> GithubLogin {
        GithubLogin::parse(s).unwrap()
    }

    fn repo(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    fn timing(window_ms: u64, grace_ms: u64) -> GateTiming {
        GateTiming {
            verification_window: Duration::from_millis(window_ms),
            grace_period: Duration::from_millis(grace_ms),
        }
    }

    fn gate(
        transport: Arc<RecordingTransport>,
        stars: Arc<ScriptedStars>,
        timing: GateTiming,
    ) -> Arc<VerificationService> {
        Arc::new(VerificationService::new(
            transport,
            stars,
            Arc::new(MemoryStore::new()),
            RepoRouter::new(Some(repo("octo/repo")), vec![]),
            MessageTemplates::default(),
            timing,
        ))
    }

    fn confirmation(sender: &UserId, text: &str) -> InboundMessage {
        InboundMessage {
            group: GroupId::new("g1"),
            sender: sender.clone(),
            text: text.to_string(),
            mentions: vec![UserId::new("bot")],
        }
    }

    #[tokio::test]
    async fn full_verification_round_trip() {
        let transport = Arc::new(RecordingTransport::moderator());
        let stars = Arc::new(ScriptedStars::new().with_star(login("alice"), repo("octo/repo")));
        let service = gate(transport.clone(), stars, timing(80, 80));
        let user = UserId::new("U1");

        service.admit(GroupId::new("g1"), user.clone()).await;
        assert_eq!(service.pending_count(), 1);

        service.handle_message(confirmation(&user, "alice")).await;
        assert_eq!(service.pending_count(), 0);
        assert_eq!(
            service.claims_for(user.clone()).await,
            vec![repo("octo/repo")]
        );

        // The verified member rejoining later is silently admitted.
        service.admit(GroupId::new("g1"), user.clone()).await;
        assert_eq!(service.pending_count(), 0);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(transport.removed_count(), 0);
    }

    #[tokio::test]
    async fn eviction_happens_only_after_both_windows() {
        let transport = Arc::new(RecordingTransport::moderator());
        let service = gate(transport.clone(), Arc::new(ScriptedStars::new()), timing(80, 80));
        let user = UserId::new("U1");
        let started = std::time::Instant::now();

        service.admit(GroupId::new("g1"), user.clone()).await;

        // Poll until the removal lands, then check the elapsed floor.
        let mut waited = Duration::ZERO;
        while transport.removed_count() == 0 && waited < Duration::from_secs(2) {
            tokio::time::sleep(Duration::from_millis(10)).await;
            waited = started.elapsed();
        }
        assert_eq!(transport.removed_count(), 1);
        assert!(
            started.elapsed() >= Duration::from_millis(160),
            "removal landed before window + grace elapsed"
        );
        assert_eq!(service.pending_count(), 0);
    }

    #[tokio::test]
    async fn confirmation_during_grace_period_wins_over_eviction() {
        let transport = Arc::new(RecordingTransport::moderator());
        let stars = Arc::new(ScriptedStars::new().with_star(login("alice"), repo("octo/repo")));
        let service = gate(transport.clone(), stars, timing(40, 120));
        let user = UserId::new("U1");

        service.admit(GroupId::new("g1"), user.clone()).await;

        // Land inside the grace period, after the warning.
        tokio::time::sleep(Duration::from_millis(80)).await;
        service.handle_message(confirmation(&user, "alice")).await;
        assert_eq!(service.pending_count(), 0);

        // The eviction task finds nothing to take and never removes.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(transport.removed_count(), 0);
        assert_eq!(
            service.claims_for(user).await,
            vec![repo("octo/repo")]
        );
    }

    #[tokio::test]
    async fn departure_during_window_prevents_eviction() {
        let transport = Arc::new(RecordingTransport::moderator());
        let service = gate(transport.clone(), Arc::new(ScriptedStars::new()), timing(40, 40));
        let user = UserId::new("U1");

        service.admit(GroupId::new("g1"), user.clone()).await;
        service.handle_departure(user).await;
        assert_eq!(service.pending_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(transport.removed_count(), 0);
    }

    #[tokio::test]
    async fn rejected_attempts_leave_the_challenge_running() {
        let transport = Arc::new(RecordingTransport::moderator());
        let stars = Arc::new(ScriptedStars::new().with_star(login("alice"), repo("octo/repo")));
        let service = gate(transport.clone(), stars.clone(), timing(120, 60));
        let user = UserId::new("U1");

        service.admit(GroupId::new("g1"), user.clone()).await;

        // Invalid syntax never reaches the star source.
        service.handle_message(confirmation(&user, "-bad-handle-")).await;
        assert_eq!(stars.probe_calls(), 0);
        assert_eq!(service.pending_count(), 1);

        // Unknown login is rejected after a probe miss.
        service.handle_message(confirmation(&user, "nobody")).await;
        assert_eq!(stars.probe_calls(), 1);
        assert_eq!(service.pending_count(), 1);

        // Third attempt with the right handle still verifies in time.
        service.handle_message(confirmation(&user, "alice")).await;
        assert_eq!(service.pending_count(), 0);
    }

    #[tokio::test]
    async fn unbind_reopens_the_challenge_on_next_join() {
        let transport = Arc::new(RecordingTransport::moderator());
        let stars = Arc::new(ScriptedStars::new().with_star(login("alice"), repo("octo/repo")));
        let service = gate(transport.clone(), stars, timing(200, 60));
        let user = UserId::new("U1");

        service.admit(GroupId::new("g1"), user.clone()).await;
        service.handle_message(confirmation(&user, "alice")).await;
        assert_eq!(
            service.unbind_claim(user.clone(), repo("octo/repo")).await.unwrap(),
            login("alice")
        );

        service.admit(GroupId::new("g1"), user.clone()).await;
        assert_eq!(service.pending_count(), 1);
    }
}
