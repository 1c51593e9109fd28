//! Concrete implementations of the outbound ports.

pub mod github;
pub mod providers;
pub mod store;

pub use github::{GithubConfig, GithubStarClient};
pub use providers::NoOpTransport;
pub use store::MemoryStore;
