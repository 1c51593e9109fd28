//! Recording and scripted port implementations for tests.

use crate::domain::errors::TransportError;
use crate::domain::value_objects::{GithubLogin, GroupId, Privilege, RepoName, UserId};
use crate::ports::outbound::{ChatTransport, StarProbe, StarSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Chat transport that records every outbound action.
pub struct RecordingTransport {
    self_id: UserId,
    privilege: Privilege,
    display_names: Mutex<HashMap<UserId, String>>,
    /// (group, text) of every sent message, in order.
    pub sent: Mutex<Vec<(GroupId, String)>>,
    /// (group, user) of every removal action, in order.
    pub removed: Mutex<Vec<(GroupId, UserId)>>,
    /// When true, removal actions fail with a transport error.
    pub fail_removals: bool,
}

impl RecordingTransport {
    /// Moderator-privileged transport with self id `bot`.
    pub fn moderator() -> Self {
        Self::with_privilege(Privilege::Admin)
    }

    pub fn with_privilege(privilege: Privilege) -> Self {
        Self {
            self_id: UserId::new("bot"),
            privilege,
            display_names: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            removed: Mutex::new(Vec::new()),
            fail_removals: false,
        }
    }

    pub fn set_display_name(&self, user: UserId, name: impl Into<String>) {
        self.display_names.lock().insert(user, name.into());
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.lock().len()
    }

    /// Text of the last sent message, if any.
    pub fn last_sent(&self) -> Option<String> {
        self.sent.lock().last().map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    fn self_id(&self) -> UserId {
        self.self_id.clone()
    }

    fn mention(&self, user: &UserId) -> String {
        format!("@{user}")
    }

    async fn send_message(&self, group: &GroupId, text: &str) -> Result<(), TransportError> {
        self.sent.lock().push((group.clone(), text.to_string()));
        Ok(())
    }

    async fn remove_member(&self, group: &GroupId, user: &UserId) -> Result<(), TransportError> {
        if self.fail_removals {
            return Err(TransportError::Rejected("scripted failure".into()));
        }
        self.removed.lock().push((group.clone(), user.clone()));
        Ok(())
    }

    async fn member_display_name(
        &self,
        _group: &GroupId,
        user: &UserId,
    ) -> Result<String, TransportError> {
        match self.display_names.lock().get(user) {
            Some(name) => Ok(name.clone()),
            None => Err(TransportError::Unavailable("no member info".into())),
        }
    }

    async fn self_privilege(&self, _group: &GroupId) -> Result<Privilege, TransportError> {
        Ok(self.privilege)
    }
}

/// Star source answering from scripted data, counting probe calls.
#[derive(Default)]
pub struct ScriptedStars {
    listings: Mutex<HashMap<RepoName, Vec<GithubLogin>>>,
    stars: Mutex<HashMap<(GithubLogin, RepoName), StarProbe>>,
    probe_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl ScriptedStars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the bulk listing for a repository.
    pub fn with_listing(self, repo: RepoName, logins: Vec<GithubLogin>) -> Self {
        self.listings.lock().insert(repo, logins);
        self
    }

    /// Script a probe hit for (login, repo).
    pub fn with_star(self, login: GithubLogin, repo: RepoName) -> Self {
        self.stars
            .lock()
            .insert((login, repo), StarProbe::hit(None));
        self
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::Relaxed)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StarSource for ScriptedStars {
    async fn fetch_stargazers(&self, repo: &RepoName) -> Vec<GithubLogin> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        self.listings.lock().get(repo).cloned().unwrap_or_default()
    }

    async fn probe_star(&self, login: &GithubLogin, repo: &RepoName) -> StarProbe {
        self.probe_calls.fetch_add(1, Ordering::Relaxed);
        self.stars
            .lock()
            .get(&(login.clone(), repo.clone()))
            .cloned()
            .unwrap_or_else(StarProbe::miss)
    }
}
