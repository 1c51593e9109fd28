//! GitHub star-graph client.
//!
//! Implements [`StarSource`] over the GitHub REST API. Both operations
//! paginate with a fixed page size, retry transient failures per page with
//! linearly increasing backoff, throttle between successful pages, and
//! degrade every failure mode to a partial (possibly empty) result with the
//! reason logged. Nothing here returns an error to the caller.

use crate::domain::value_objects::{GithubLogin, RepoName};
use crate::ports::outbound::{StarProbe, StarSource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const USER_AGENT_VALUE: &str = "star-warden";
const ACCEPT_V3: &str = "application/vnd.github.v3+json";
/// Variant media type whose payload carries `starred_at` timestamps.
const ACCEPT_STAR: &str = "application/vnd.github.star+json";

/// Tuning knobs for the GitHub client.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Personal access token; sent as `token <...>`.
    pub token: String,
    /// API root, overridable for GitHub Enterprise installs.
    pub api_base: String,
    /// Listing page size.
    pub page_size: u32,
    /// Per-page attempts on transient failures.
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `n * backoff_base`.
    pub backoff_base: Duration,
    /// Pause between successful page fetches.
    pub page_throttle: Duration,
    /// Upper bound on probed starred-listing pages per login.
    pub probe_page_cap: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl GithubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: "https://api.github.com".to_string(),
            page_size: 100,
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            page_throttle: Duration::from_millis(100),
            probe_page_cap: 20,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// How a non-200 page response terminates or continues the fetch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageDisposition {
    /// 5xx: retry this page, up to the attempt cap.
    Transient,
    /// 403 with exhausted quota: stop, partial result is valid.
    RateLimited,
    /// 422: pagination ran past the end; normal completion.
    EndOfListing,
    /// 401: token rejected; stop hard.
    Unauthorized,
    /// 404: repository or user invisible; stop hard.
    NotFound,
    /// 403 without rate-limit markers: permissions problem; stop hard.
    Forbidden,
    /// Anything else; stop hard.
    Unexpected,
}

/// Classify a non-200 response. A 403 counts as rate limiting when the
/// quota header reads zero or the body says so; every other 403 is a
/// permissions failure.
pub(crate) fn classify_status(
    status: u16,
    rate_limit_remaining: Option<&str>,
    body: &str,
) -> PageDisposition {
    match status {
        401 => PageDisposition::Unauthorized,
        403 => {
            if rate_limit_remaining == Some("0") || body.to_lowercase().contains("rate limit") {
                PageDisposition::RateLimited
            } else {
                PageDisposition::Forbidden
            }
        }
        404 => PageDisposition::NotFound,
        422 => PageDisposition::EndOfListing,
        500..=599 => PageDisposition::Transient,
        _ => PageDisposition::Unexpected,
    }
}

/// Terminal outcome of fetching one page, after retries.
enum PageFetch {
    /// 200 with body.
    Payload(String),
    /// Listing is over or quota ran out; accumulated data stands.
    SoftStop(&'static str),
    /// Fetch cannot continue; accumulated data still stands, reason logged
    /// at error level by the caller.
    HardStop(String),
}

#[derive(Debug, Deserialize)]
struct StargazerUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct StarredEntry {
    #[serde(default)]
    starred_at: Option<DateTime<Utc>>,
    repo: StarredRepo,
}

#[derive(Debug, Deserialize)]
struct StarredRepo {
    full_name: String,
}

/// Reqwest-backed [`StarSource`].
pub struct GithubStarClient {
    http: reqwest::Client,
    cfg: GithubConfig,
}

impl GithubStarClient {
    pub fn new(cfg: GithubConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self { http, cfg })
    }

    async fn get_page(&self, url: &str, page: u32, accept: &'static str) -> PageFetch {
        let mut attempt = 1;
        loop {
            let sent = self
                .http
                .get(url)
                .header(AUTHORIZATION, format!("token {}", self.cfg.token))
                .header(ACCEPT, accept)
                .header(USER_AGENT, USER_AGENT_VALUE)
                .query(&[
                    ("page", page.to_string()),
                    ("per_page", self.cfg.page_size.to_string()),
                ])
                .send()
                .await;

            match sent {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if status == 200 {
                        return match resp.text().await {
                            Ok(body) => PageFetch::Payload(body),
                            Err(e) => PageFetch::HardStop(format!("body read failed: {e}")),
                        };
                    }
                    let remaining = resp
                        .headers()
                        .get("x-ratelimit-remaining")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let body = resp.text().await.unwrap_or_default();
                    match classify_status(status, remaining.as_deref(), &body) {
                        PageDisposition::Transient => {
                            if attempt < self.cfg.max_retries {
                                tokio::time::sleep(self.cfg.backoff_base * attempt).await;
                                attempt += 1;
                                continue;
                            }
                            return PageFetch::HardStop(format!(
                                "server error {status} persisted across {} attempts",
                                self.cfg.max_retries
                            ));
                        }
                        PageDisposition::RateLimited => return PageFetch::SoftStop("rate limited"),
                        PageDisposition::EndOfListing => {
                            return PageFetch::SoftStop("end of listing")
                        }
                        PageDisposition::Unauthorized => {
                            return PageFetch::HardStop("authentication rejected (401)".into())
                        }
                        PageDisposition::NotFound => {
                            return PageFetch::HardStop("repository or user not found (404)".into())
                        }
                        PageDisposition::Forbidden => {
                            return PageFetch::HardStop("access forbidden (403)".into())
                        }
                        PageDisposition::Unexpected => {
                            return PageFetch::HardStop(format!("unexpected status {status}"))
                        }
                    }
                }
                Err(e) if e.is_timeout() => {
                    if attempt < self.cfg.max_retries {
                        tokio::time::sleep(self.cfg.backoff_base * attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return PageFetch::HardStop(format!(
                        "timed out across {} attempts",
                        self.cfg.max_retries
                    ));
                }
                Err(e) => return PageFetch::HardStop(format!("request failed: {e}")),
            }
        }
    }
}

#[async_trait]
impl StarSource for GithubStarClient {
    async fn fetch_stargazers(&self, repo: &RepoName) -> Vec<GithubLogin> {
        let url = format!("{}/repos/{}/stargazers", self.cfg.api_base, repo);
        let mut collected = Vec::new();
        let mut page = 1u32;

        info!(repo = %repo, "fetching stargazer listing");
        loop {
            match self.get_page(&url, page, ACCEPT_V3).await {
                PageFetch::Payload(body) => {
                    let users: Vec<StargazerUser> = match serde_json::from_str(&body) {
                        Ok(users) => users,
                        Err(e) => {
                            error!(repo = %repo, page, error = %e, "stargazer page failed to decode");
                            return collected;
                        }
                    };
                    if users.is_empty() {
                        info!(repo = %repo, total = collected.len(), "stargazer listing complete");
                        return collected;
                    }
                    for user in users {
                        match GithubLogin::parse(&user.login) {
                            Ok(login) => collected.push(login),
                            Err(_) => debug!(login = %user.login, "skipping unparseable login"),
                        }
                    }
                    debug!(repo = %repo, page, total = collected.len(), "stargazer page fetched");
                    page += 1;
                    tokio::time::sleep(self.cfg.page_throttle).await;
                }
                PageFetch::SoftStop(reason) => {
                    warn!(repo = %repo, page, reason, total = collected.len(), "stargazer fetch stopped early");
                    return collected;
                }
                PageFetch::HardStop(reason) => {
                    error!(repo = %repo, page, reason, total = collected.len(), "stargazer fetch aborted");
                    return collected;
                }
            }
        }
    }

    async fn probe_star(&self, login: &GithubLogin, repo: &RepoName) -> StarProbe {
        let url = format!("{}/users/{}/starred", self.cfg.api_base, login);
        let mut checked = 0usize;

        debug!(login = %login, repo = %repo, "probing starred listing");
        for page in 1..=self.cfg.probe_page_cap {
            match self.get_page(&url, page, ACCEPT_STAR).await {
                PageFetch::Payload(body) => {
                    let entries: Vec<StarredEntry> = match serde_json::from_str(&body) {
                        Ok(entries) => entries,
                        Err(e) => {
                            error!(login = %login, page, error = %e, "starred page failed to decode");
                            return StarProbe::miss();
                        }
                    };
                    if entries.is_empty() {
                        break;
                    }
                    checked += entries.len();
                    if let Some(entry) = entries
                        .iter()
                        .find(|e| e.repo.full_name == repo.as_str())
                    {
                        info!(login = %login, repo = %repo, starred_at = ?entry.starred_at, "star found by probe");
                        return StarProbe::hit(entry.starred_at);
                    }
                    tokio::time::sleep(self.cfg.page_throttle).await;
                }
                PageFetch::SoftStop(reason) => {
                    warn!(login = %login, page, reason, "starred probe stopped early");
                    return StarProbe::miss();
                }
                PageFetch::HardStop(reason) => {
                    error!(login = %login, page, reason, "starred probe aborted");
                    return StarProbe::miss();
                }
            }
        }
        debug!(login = %login, repo = %repo, checked, "star not found by probe");
        StarProbe::miss()
    }
}
