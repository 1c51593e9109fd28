//! Membership event handling: the verification state machine.
//!
//! Per member the lifecycle is absent → pending → exactly one of verified,
//! abandoned (left early), or evicted (timeout). The pending set's atomic
//! removal decides the winner; every other path observes the missing entry
//! and does nothing. No error escapes an event handler: transport and
//! source failures degrade to logged no-ops.

use crate::domain::entities::PendingChallenge;
use crate::domain::templates::TemplateArgs;
use crate::domain::value_objects::{GithubLogin, GroupId, RepoName, UserId};
use crate::ports::inbound::InboundMessage;
use crate::service::core::VerificationService;
use tracing::{debug, info, warn};

impl VerificationService {
    /// Handle a join notice. See [`crate::ports::inbound::MembershipGate::admit`].
    pub async fn on_join(&self, group: GroupId, user: UserId) {
        match self.transport.self_privilege(&group).await {
            Ok(privilege) if privilege.can_remove_members() => {}
            Ok(_) => {
                warn!(group = %group, "not a moderator in this group, skipping verification");
                return;
            }
            Err(e) => {
                warn!(group = %group, error = %e, "privilege check failed, skipping verification");
                return;
            }
        }

        let Some(repo) = self.router.resolve(&group).cloned() else {
            warn!(group = %group, "no repository routed for group, skipping verification");
            return;
        };

        if let Some(login) = self.ledger.claimant_of(&user, &repo) {
            info!(user = %user, login = %login, repo = %repo, "already bound, admitted without challenge");
            return;
        }

        // Duplicate join notices restart the challenge.
        self.pending.cancel(&user);

        let member_name = self.display_name(&group, &user).await;
        let prompt = TemplateArgs::new()
            .member_name(self.transport.mention(&user))
            .at_mention(self.transport.mention(&user))
            .repo(repo.as_str())
            .timeout_minutes((self.timing.verification_window.as_secs() / 60).max(1))
            .render(&self.templates.join_prompt);
        self.send(&group, &prompt).await;

        let timeout = self.spawn_timeout(user.clone(), group.clone(), repo.clone(), member_name);
        self.pending.begin(
            user.clone(),
            PendingChallenge {
                group: group.clone(),
                repo: repo.clone(),
            },
            timeout,
        );
        info!(user = %user, group = %group, repo = %repo, "verification challenge issued");
    }

    /// Handle a group message. Only pending senders that @-mention the bot
    /// participate; everything else is ignored.
    pub async fn on_message(&self, message: InboundMessage) {
        let Some(challenge) = self.pending.challenge_of(&message.sender) else {
            return;
        };
        if !message.mentions.contains(&self.transport.self_id()) {
            return;
        }

        let group = challenge.group;
        let repo = challenge.repo;
        let at = self.transport.mention(&message.sender);

        let login = match GithubLogin::parse(message.text.trim()) {
            Ok(login) => login,
            Err(_) => {
                let reply = TemplateArgs::new()
                    .at_mention(at.as_str())
                    .render(&self.templates.invalid_handle);
                self.send(&group, &reply).await;
                return;
            }
        };

        // Cheap ledger check first; the per-login probe is the fallback,
        // with a positive result written back so the next check is cheap.
        let mut starred = self.ledger.is_member(&login, &repo);
        if !starred {
            let probe = self.stars.probe_star(&login, &repo).await;
            if probe.starred {
                self.ledger
                    .record_seen(&login, &repo, probe.starred_at.map(|t| t.timestamp()));
                starred = true;
            }
        }
        if !starred {
            let reply = TemplateArgs::new()
                .at_mention(at.as_str())
                .repo(repo.as_str())
                .render(&self.templates.not_a_stargazer);
            self.send(&group, &reply).await;
            return;
        }

        if let Some(owner) = self.ledger.claim_owner(&login, &repo) {
            if owner != message.sender {
                let reply = TemplateArgs::new()
                    .at_mention(at.as_str())
                    .render(&self.templates.already_claimed);
                self.send(&group, &reply).await;
                return;
            }
        }

        if !self.ledger.bind(&login, &message.sender, &repo) {
            let reply = TemplateArgs::new()
                .at_mention(at.as_str())
                .render(&self.templates.retry_later);
            self.send(&group, &reply).await;
            return;
        }

        self.pending.cancel(&message.sender);
        let reply = TemplateArgs::new()
            .at_mention(at.as_str())
            .repo(repo.as_str())
            .render(&self.templates.welcome);
        self.send(&group, &reply).await;
        info!(user = %message.sender, login = %login, repo = %repo, "verification succeeded");
    }

    /// Handle a departure notice: abandon any pending challenge. The member
    /// already left, so no removal action is issued.
    pub async fn on_departure(&self, user: UserId) {
        if self.pending.cancel(&user) {
            info!(user = %user, "pending member left, challenge abandoned");
        }
    }

    /// Spawn the owned timeout task for one challenge: sleep the window,
    /// warn, sleep the grace period, then evict if still unresolved.
    fn spawn_timeout(
        &self,
        user: UserId,
        group: GroupId,
        repo: RepoName,
        member_name: String,
    ) -> tokio::task::AbortHandle {
        let transport = std::sync::Arc::clone(&self.transport);
        let pending = std::sync::Arc::clone(&self.pending);
        let templates = self.templates.clone();
        let timing = self.timing;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(timing.verification_window).await;
            if !pending.contains(&user) {
                return;
            }

            let warning = TemplateArgs::new()
                .at_mention(transport.mention(&user))
                .countdown_seconds(timing.grace_period.as_secs())
                .render(&templates.timeout_warning);
            if let Err(e) = transport.send_message(&group, &warning).await {
                warn!(group = %group, error = %e, "timeout warning not delivered");
            }

            tokio::time::sleep(timing.grace_period).await;
            // The single decision point: whoever removes the entry wins.
            // A confirmation or departure during the grace sleep leaves
            // nothing to take and this task exits without acting.
            if pending.take(&user).is_none() {
                return;
            }

            match transport.remove_member(&group, &user).await {
                Ok(()) => {
                    info!(user = %user, group = %group, repo = %repo, "verification timed out, member removed");
                    let notice = TemplateArgs::new()
                        .member_name(member_name.as_str())
                        .render(&templates.kick_notice);
                    if let Err(e) = transport.send_message(&group, &notice).await {
                        warn!(group = %group, error = %e, "removal notice not delivered");
                    }
                }
                Err(e) => {
                    // No retry: the member stays but is no longer tracked.
                    warn!(user = %user, group = %group, error = %e, "removal action failed");
                }
            }
        });
        handle.abort_handle()
    }

    pub(crate) async fn display_name(&self, group: &GroupId, user: &UserId) -> String {
        match self.transport.member_display_name(group, user).await {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => user.as_str().to_string(),
            Err(e) => {
                debug!(user = %user, error = %e, "display name lookup failed");
                user.as_str().to_string()
            }
        }
    }

    pub(crate) async fn send(&self, group: &GroupId, text: &str) {
        if let Err(e) = self.transport.send_message(group, text).await {
            warn!(group = %group, error = %e, "message not delivered");
        }
    }
}
