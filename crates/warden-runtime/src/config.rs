//! Static TOML configuration.
//!
//! Everything the runtime needs is loaded once at startup and immutable
//! afterwards: the API token, repository routing, timing, storage path, and
//! message templates.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use warden_core::{
    GateTiming, GithubConfig, GroupId, InvalidRepoName, MessageTemplates, RepoName, RepoRouter,
};

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid repository `{name}`: {source}")]
    BadRepo {
        name: String,
        source: InvalidRepoName,
    },
    #[error("{0}")]
    Invalid(&'static str),
}

fn default_data_dir() -> String {
    "./data/warden".to_string()
}

fn default_window_secs() -> u64 {
    300
}

fn default_grace_secs() -> u64 {
    60
}

/// Root configuration file.
///
/// ```toml
/// github_token = "ghp_..."
/// default_repo = "octo/repo"
/// data_dir = "/var/lib/warden"
/// verification_window_secs = 300
/// grace_period_secs = 60
/// resync_interval_secs = 3600
///
/// [routes]
/// "123456789" = "octo/other-repo"
///
/// [templates]
/// welcome = "{at_mention} verified!"
/// ```
#[derive(Debug, Deserialize)]
pub struct WardenConfig {
    pub github_token: String,
    #[serde(default)]
    pub default_repo: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_window_secs")]
    pub verification_window_secs: u64,
    #[serde(default = "default_grace_secs")]
    pub grace_period_secs: u64,
    /// 0 disables the periodic resync loop.
    #[serde(default)]
    pub resync_interval_secs: u64,
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
    #[serde(default)]
    pub templates: MessageTemplates,
}

impl WardenConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// A token and at least one governed repository are required.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_token.trim().is_empty() {
            return Err(ConfigError::Invalid("github_token must be set"));
        }
        if self.default_repo.is_none() && self.routes.is_empty() {
            return Err(ConfigError::Invalid(
                "configure default_repo or at least one [routes] entry",
            ));
        }
        Ok(())
    }

    /// Build the routing table, validating every repository name.
    pub fn router(&self) -> Result<RepoRouter, ConfigError> {
        let parse = |name: &str| {
            RepoName::parse(name).map_err(|source| ConfigError::BadRepo {
                name: name.to_string(),
                source,
            })
        };
        let default = self.default_repo.as_deref().map(parse).transpose()?;
        let mut routes = Vec::with_capacity(self.routes.len());
        for (group, repo) in &self.routes {
            routes.push((GroupId::new(group.clone()), parse(repo)?));
        }
        Ok(RepoRouter::new(default, routes))
    }

    pub fn timing(&self) -> GateTiming {
        GateTiming {
            verification_window: Duration::from_secs(self.verification_window_secs),
            grace_period: Duration::from_secs(self.grace_period_secs),
        }
    }

    pub fn github(&self) -> GithubConfig {
        GithubConfig::new(self.github_token.clone())
    }

    /// Resync cadence, when enabled.
    pub fn resync_interval(&self) -> Option<Duration> {
        (self.resync_interval_secs > 0).then(|| Duration::from_secs(self.resync_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<WardenConfig, ConfigError> {
        let config: WardenConfig = toml::from_str(text).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_with_defaults() {
        let config = parse(
            r#"
            github_token = "tok"
            default_repo = "octo/repo"
            "#,
        )
        .unwrap();
        assert_eq!(config.verification_window_secs, 300);
        assert_eq!(config.grace_period_secs, 60);
        assert!(config.resync_interval().is_none());
        let router = config.router().unwrap();
        assert_eq!(router.ordered_repos().len(), 1);
    }

    #[test]
    fn routes_resolve_and_validate() {
        let config = parse(
            r#"
            github_token = "tok"
            [routes]
            "123" = "octo/a"
            "456" = "octo/b"
            "#,
        )
        .unwrap();
        let router = config.router().unwrap();
        assert_eq!(
            router.resolve(&GroupId::new("123")),
            Some(&RepoName::parse("octo/a").unwrap())
        );
        assert_eq!(router.resolve(&GroupId::new("999")), None);
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            parse(
                r#"
                github_token = "  "
                default_repo = "octo/repo"
                "#
            ),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_repos_are_rejected() {
        assert!(matches!(
            parse(r#"github_token = "tok""#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_repo_is_rejected() {
        let config = parse(
            r#"
            github_token = "tok"
            default_repo = "not-a-repo"
            "#,
        )
        .unwrap();
        assert!(matches!(config.router(), Err(ConfigError::BadRepo { .. })));
    }

    #[test]
    fn template_overrides_merge_with_defaults() {
        let config = parse(
            r#"
            github_token = "tok"
            default_repo = "octo/repo"
            [templates]
            welcome = "custom {at_mention}"
            "#,
        )
        .unwrap();
        assert_eq!(config.templates.welcome, "custom {at_mention}");
        assert!(!config.templates.join_prompt.is_empty());
    }
}
