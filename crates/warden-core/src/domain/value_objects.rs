//! Identifier newtypes shared across the verification gate.
//!
//! Chat-platform identifiers (`GroupId`, `UserId`) are opaque strings; the
//! GitHub-side identifiers (`GithubLogin`, `RepoName`) carry syntactic
//! validation so that malformed input is rejected before any network or
//! store access happens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a GitHub account handle.
pub const MAX_LOGIN_LEN: usize = 39;

/// Identifier of a managed chat group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a chat-platform member (the local identity in a binding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A syntactically valid GitHub account handle.
///
/// Rules: 1 to 39 characters, ASCII alphanumerics and hyphens only, and the
/// handle may not start or end with a hyphen. Parsing rejects everything
/// else, which keeps invalid confirmation attempts off the network entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GithubLogin(String);

impl GithubLogin {
    /// Validate and wrap a candidate handle. Leading/trailing whitespace is
    /// not tolerated; callers trim before parsing.
    pub fn parse(candidate: &str) -> Result<Self, InvalidLogin> {
        if candidate.is_empty() || candidate.len() > MAX_LOGIN_LEN {
            return Err(InvalidLogin);
        }
        if candidate.starts_with('-') || candidate.ends_with('-') {
            return Err(InvalidLogin);
        }
        if !candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(InvalidLogin);
        }
        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GithubLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate text failed GitHub handle validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLogin;

impl fmt::Display for InvalidLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a valid GitHub handle")
    }
}

impl std::error::Error for InvalidLogin {}

/// A repository in `owner/name` form.
///
/// Owner follows the handle rules above; the name part additionally allows
/// dots and underscores. Neither part may contain `:`, which keeps the
/// colon-delimited store keys unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoName(String);

impl RepoName {
    pub fn parse(candidate: &str) -> Result<Self, InvalidRepoName> {
        let (owner, name) = candidate.split_once('/').ok_or(InvalidRepoName)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(InvalidRepoName);
        }
        if !owner
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(InvalidRepoName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(InvalidRepoName);
        }
        Ok(Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository text was not a valid `owner/name` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRepoName;

impl fmt::Display for InvalidRepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a valid owner/name repository")
    }
}

impl std::error::Error for InvalidRepoName {}

/// Moderation capability of the bot account inside a group, as reported by
/// the chat platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Ordinary member; cannot remove anyone.
    Member,
    /// Group administrator.
    Admin,
    /// Group owner.
    Owner,
}

impl Privilege {
    /// Whether this privilege level permits removing other members.
    pub fn can_remove_members(self) -> bool {
        matches!(self, Privilege::Admin | Privilege::Owner)
    }
}
