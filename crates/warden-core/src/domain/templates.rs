//! Operator-configurable message templates.
//!
//! Each outbound chat message has its own template with named placeholders.
//! Rendering substitutes only the placeholders the call site provides;
//! anything unrecognized is left in the text untouched, so a typo in an
//! operator's template can never fail a send.

use serde::Deserialize;

/// One template per user-facing message.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    /// Challenge prompt sent when a new member enters verification.
    pub join_prompt: String,
    /// Sent after a successful verification.
    pub welcome: String,
    /// Warning sent when the verification window elapses.
    pub timeout_warning: String,
    /// Notice sent after a member has been removed.
    pub kick_notice: String,
    /// Rejection: the submitted login has not starred the repository.
    pub not_a_stargazer: String,
    /// Rejection: the login is claimed by another member.
    pub already_claimed: String,
    /// Rejection: the submitted text is not a plausible handle.
    pub invalid_handle: String,
    /// Generic retry message when a bind could not be completed.
    pub retry_later: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            join_prompt: "Welcome {member_name}! Reply within {timeout_minutes} minutes by \
                          mentioning me with your GitHub username. Only stargazers of {repo} \
                          may stay in this group."
                .to_string(),
            welcome: "{at_mention} GitHub verification passed, welcome aboard!".to_string(),
            timeout_warning: "{at_mention} verification timed out, you will be removed in \
                              {countdown_seconds} seconds."
                .to_string(),
            kick_notice: "{member_name} was removed for failing GitHub verification.".to_string(),
            not_a_stargazer: "{at_mention} verification failed: that account has not starred \
                              {repo} or does not exist."
                .to_string(),
            already_claimed: "{at_mention} verification failed: that GitHub account is already \
                              claimed by another member."
                .to_string(),
            invalid_handle: "{at_mention} verification failed: please send a valid GitHub \
                             username."
                .to_string(),
            retry_later: "{at_mention} binding failed, please try again later.".to_string(),
        }
    }
}

/// Placeholder values for one render. Unset fields leave their placeholder
/// in the output.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    member_name: Option<String>,
    at_mention: Option<String>,
    repo: Option<String>,
    timeout_minutes: Option<u64>,
    countdown_seconds: Option<u64>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_name(mut self, name: impl Into<String>) -> Self {
        self.member_name = Some(name.into());
        self
    }

    pub fn at_mention(mut self, mention: impl Into<String>) -> Self {
        self.at_mention = Some(mention.into());
        self
    }

    pub fn repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn timeout_minutes(mut self, minutes: u64) -> Self {
        self.timeout_minutes = Some(minutes);
        self
    }

    pub fn countdown_seconds(mut self, seconds: u64) -> Self {
        self.countdown_seconds = Some(seconds);
        self
    }

    /// Substitute the provided placeholders into `template`.
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        if let Some(v) = &self.member_name {
            out = out.replace("{member_name}", v);
        }
        if let Some(v) = &self.at_mention {
            out = out.replace("{at_mention}", v);
        }
        if let Some(v) = &self.repo {
            out = out.replace("{repo}", v);
        }
        if let Some(v) = self.timeout_minutes {
            out = out.replace("{timeout_minutes}", &v.to_string());
        }
        if let Some(v) = self.countdown_seconds {
            out = out.replace("{countdown_seconds}", &v.to_string());
        }
        out
    }
}
