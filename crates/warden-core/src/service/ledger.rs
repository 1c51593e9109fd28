//! Verification ledger.
//!
//! Durable mapping from (login, repository) to the chat member claiming it.
//! Rows are keyed `member:{repo}:{login}` with a reverse claim index
//! `claim:{repo}:{user}` so both lookup directions are single reads; row and
//! index are always written in one atomic batch.
//!
//! Binding uniqueness is enforced at bind time under one mutex, so two
//! concurrent binds for the same member cannot interleave between the check
//! and the write. Rows are never deleted: a login that leaves the external
//! star set keeps its row (and any claim) until explicitly unbound.
//!
//! Every public operation degrades store failures to a safe default
//! (false / none / zero / empty) and logs the cause; callers treat such
//! defaults as "cannot currently confirm", not as definitive negatives.

use crate::domain::entities::BindingRecord;
use crate::domain::errors::StoreError;
use crate::domain::value_objects::{GithubLogin, RepoName, UserId};
use crate::ports::outbound::{BatchOperation, KeyValueStore};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};

const MEMBER_PREFIX: &str = "member:";
const CLAIM_PREFIX: &str = "claim:";

fn member_key(repo: &RepoName, login: &GithubLogin) -> Vec<u8> {
    format!("{MEMBER_PREFIX}{repo}:{login}").into_bytes()
}

fn member_prefix(repo: &RepoName) -> Vec<u8> {
    format!("{MEMBER_PREFIX}{repo}:").into_bytes()
}

fn claim_key(repo: &RepoName, user: &UserId) -> Vec<u8> {
    format!("{CLAIM_PREFIX}{repo}:{user}").into_bytes()
}

fn claim_prefix(repo: &RepoName) -> Vec<u8> {
    format!("{CLAIM_PREFIX}{repo}:").into_bytes()
}

/// Login portion of a `member:{repo}:{login}` key.
fn login_of_member_key(key: &[u8], prefix_len: usize) -> Option<&str> {
    std::str::from_utf8(key.get(prefix_len..)?).ok()
}

/// `(repo, user)` portions of a `claim:{repo}:{user}` key. The user id is
/// the suffix after the last colon; repo names and logins cannot contain
/// one, user ids may not either (enforced at the transport boundary by the
/// platforms this gate targets, which use numeric ids).
fn parse_claim_key(key: &[u8]) -> Option<(&str, &str)> {
    let text = std::str::from_utf8(key).ok()?;
    let rest = text.strip_prefix(CLAIM_PREFIX)?;
    rest.rsplit_once(':')
}

fn decode_record(bytes: &[u8]) -> Result<BindingRecord, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Codec(e.to_string()))
}

fn encode_record(record: &BindingRecord) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(record).map_err(|e| StoreError::Codec(e.to_string()))
}

/// Durable star-membership and claim ledger over a key-value substrate.
pub struct Ledger {
    store: Arc<dyn KeyValueStore>,
    /// Serializes every check-then-write sequence. Held only across
    /// synchronous store calls, never across an await point.
    write_lock: Mutex<()>,
}

impl Ledger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Record that `login` was observed in the star set of `repo`.
    /// Idempotent: an existing row only gets its refresh timestamp bumped,
    /// preserving any claim. `seen_at` is the star timestamp when known.
    pub fn record_seen(&self, login: &GithubLogin, repo: &RepoName, seen_at: Option<i64>) -> bool {
        self.try_record_seen(login, repo, seen_at)
            .unwrap_or_else(|e| {
                error!(login = %login, repo = %repo, error = %e, "record_seen degraded");
                false
            })
    }

    fn try_record_seen(
        &self,
        login: &GithubLogin,
        repo: &RepoName,
        seen_at: Option<i64>,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let now = Utc::now().timestamp();
        let key = member_key(repo, login);
        let record = match self.store.get(&key)? {
            Some(bytes) => {
                let mut record = decode_record(&bytes)?;
                record.updated_at = now;
                record
            }
            None => BindingRecord::observed(seen_at.unwrap_or(now), now),
        };
        self.store.put(&key, &encode_record(&record)?)?;
        Ok(true)
    }

    /// Insert every login from `logins` that is not yet known for `repo`.
    /// Pure set difference: existing rows are untouched and nothing is ever
    /// deleted, so claims survive a shrinking external star set.
    pub fn sync_bulk(&self, logins: &[GithubLogin], repo: &RepoName) -> bool {
        self.try_sync_bulk(logins, repo).unwrap_or_else(|e| {
            error!(repo = %repo, error = %e, "sync_bulk degraded");
            false
        })
    }

    fn try_sync_bulk(&self, logins: &[GithubLogin], repo: &RepoName) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();
        let prefix = member_prefix(repo);
        let known: HashSet<String> = self
            .store
            .prefix_scan(&prefix)?
            .into_iter()
            .filter_map(|(key, _)| {
                login_of_member_key(&key, prefix.len()).map(|s| s.to_string())
            })
            .collect();

        let now = Utc::now().timestamp();
        let fresh = BindingRecord::observed(now, now);
        let encoded = encode_record(&fresh)?;
        let mut batch = Vec::new();
        let mut seen = HashSet::new();
        for login in logins {
            if known.contains(login.as_str()) || !seen.insert(login.as_str()) {
                continue;
            }
            batch.push(BatchOperation::put(member_key(repo, login), encoded.clone()));
        }
        let inserted = batch.len();
        if inserted > 0 {
            self.store.atomic_batch_write(batch)?;
        }
        info!(repo = %repo, inserted, known = known.len(), "star set synchronized");
        Ok(true)
    }

    /// Whether `login` is a known stargazer of `repo`.
    pub fn is_member(&self, login: &GithubLogin, repo: &RepoName) -> bool {
        self.store
            .exists(&member_key(repo, login))
            .unwrap_or_else(|e| {
                error!(login = %login, repo = %repo, error = %e, "is_member degraded");
                false
            })
    }

    /// The member currently claiming `login` for `repo`, if any.
    pub fn claim_owner(&self, login: &GithubLogin, repo: &RepoName) -> Option<UserId> {
        self.try_claim_owner(login, repo).unwrap_or_else(|e| {
            error!(login = %login, repo = %repo, error = %e, "claim_owner degraded");
            None
        })
    }

    fn try_claim_owner(
        &self,
        login: &GithubLogin,
        repo: &RepoName,
    ) -> Result<Option<UserId>, StoreError> {
        match self.store.get(&member_key(repo, login))? {
            Some(bytes) => Ok(decode_record(&bytes)?.claimant),
            None => Ok(None),
        }
    }

    /// Reverse lookup: the login `user` claims for `repo`, if any.
    pub fn claimant_of(&self, user: &UserId, repo: &RepoName) -> Option<GithubLogin> {
        self.try_claimant_of(user, repo).unwrap_or_else(|e| {
            error!(user = %user, repo = %repo, error = %e, "claimant_of degraded");
            None
        })
    }

    fn try_claimant_of(
        &self,
        user: &UserId,
        repo: &RepoName,
    ) -> Result<Option<GithubLogin>, StoreError> {
        match self.store.get(&claim_key(repo, user))? {
            Some(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| StoreError::Codec(e.to_string()))?;
                Ok(GithubLogin::parse(&text).ok())
            }
            None => Ok(None),
        }
    }

    /// Claim `login` for `user` in `repo`.
    ///
    /// Fails without state change when the member already claims a
    /// different login, when the login row does not exist, or when the
    /// login is already claimed by a different member. Re-binding the same
    /// pair is idempotent and refreshes the timestamp.
    pub fn bind(&self, login: &GithubLogin, user: &UserId, repo: &RepoName) -> bool {
        self.try_bind(login, user, repo).unwrap_or_else(|e| {
            error!(login = %login, user = %user, repo = %repo, error = %e, "bind degraded");
            false
        })
    }

    fn try_bind(
        &self,
        login: &GithubLogin,
        user: &UserId,
        repo: &RepoName,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();

        if let Some(existing) = self.try_claimant_of(user, repo)? {
            if existing != *login {
                return Ok(false);
            }
        }
        let key = member_key(repo, login);
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(false);
        };
        let mut record = decode_record(&bytes)?;
        match &record.claimant {
            Some(current) if current != user => return Ok(false),
            _ => {}
        }
        record.claimant = Some(user.clone());
        record.updated_at = Utc::now().timestamp();
        self.store.atomic_batch_write(vec![
            BatchOperation::put(key, encode_record(&record)?),
            BatchOperation::put(claim_key(repo, user), login.as_str().as_bytes().to_vec()),
        ])?;
        Ok(true)
    }

    /// Release the claim `user` holds for `repo`. The row itself survives;
    /// only the claim is cleared. False when no claim exists.
    pub fn unbind(&self, user: &UserId, repo: &RepoName) -> bool {
        self.try_unbind(user, repo).unwrap_or_else(|e| {
            error!(user = %user, repo = %repo, error = %e, "unbind degraded");
            false
        })
    }

    fn try_unbind(&self, user: &UserId, repo: &RepoName) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock();

        let Some(login) = self.try_claimant_of(user, repo)? else {
            return Ok(false);
        };
        let mut batch = vec![BatchOperation::delete(claim_key(repo, user))];
        let key = member_key(repo, &login);
        if let Some(bytes) = self.store.get(&key)? {
            let mut record = decode_record(&bytes)?;
            if record.claimant.as_ref() == Some(user) {
                record.claimant = None;
                record.updated_at = Utc::now().timestamp();
                batch.push(BatchOperation::put(key, encode_record(&record)?));
            }
        }
        self.store.atomic_batch_write(batch)?;
        Ok(true)
    }

    /// Number of known stargazers for `repo`.
    pub fn member_count(&self, repo: &RepoName) -> u64 {
        self.store
            .prefix_scan(&member_prefix(repo))
            .map(|rows| rows.len() as u64)
            .unwrap_or_else(|e| {
                error!(repo = %repo, error = %e, "member_count degraded");
                0
            })
    }

    /// Number of claimed stargazers for `repo`.
    pub fn claimed_count(&self, repo: &RepoName) -> u64 {
        self.store
            .prefix_scan(&claim_prefix(repo))
            .map(|rows| rows.len() as u64)
            .unwrap_or_else(|e| {
                error!(repo = %repo, error = %e, "claimed_count degraded");
                0
            })
    }

    /// Every repository where `user` holds a claim, lexicographically
    /// ordered. Presentation ordering (default repo first, then router
    /// configuration order) is layered on by the service.
    pub fn claimed_repos_for(&self, user: &UserId) -> Vec<RepoName> {
        self.try_claimed_repos_for(user).unwrap_or_else(|e| {
            error!(user = %user, error = %e, "claimed_repos_for degraded");
            Vec::new()
        })
    }

    fn try_claimed_repos_for(&self, user: &UserId) -> Result<Vec<RepoName>, StoreError> {
        let mut repos: Vec<RepoName> = self
            .store
            .prefix_scan(CLAIM_PREFIX.as_bytes())?
            .into_iter()
            .filter_map(|(key, _)| {
                let (repo, claimant) = parse_claim_key(&key)?;
                if claimant == user.as_str() {
                    RepoName::parse(repo).ok()
                } else {
                    None
                }
            })
            .collect();
        repos.sort();
        repos.dedup();
        Ok(repos)
    }
}
