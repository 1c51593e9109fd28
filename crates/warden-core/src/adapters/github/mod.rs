//! GitHub API adapter.

mod client;

pub use client::{GithubConfig, GithubStarClient};
