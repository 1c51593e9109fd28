//! # StarWarden Core
//!
//! Group-membership verification gate: new members of a managed chat group
//! must prove control of a GitHub account that has starred the group's
//! configured repository within a time window, or be removed.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - **Domain Layer:** identifiers, binding records, routing, templates,
//!   and the pending-challenge set
//! - **Ports Layer:** the inbound [`MembershipGate`] API and the outbound
//!   SPI traits ([`ChatTransport`], [`StarSource`], [`KeyValueStore`])
//! - **Service Layer:** the [`VerificationService`] coordinator and the
//!   [`Ledger`]
//! - **Adapters Layer:** GitHub HTTP client, in-memory store, no-op
//!   transport
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_core::{
//!     GateTiming, MemoryStore, MessageTemplates, NoOpTransport,
//!     RepoName, RepoRouter, VerificationService,
//! };
//! use warden_core::adapters::github::{GithubConfig, GithubStarClient};
//!
//! let router = RepoRouter::new(Some(RepoName::parse("octo/repo").unwrap()), vec![]);
//! let stars = GithubStarClient::new(GithubConfig::new("token")).unwrap();
//! let service = VerificationService::new(
//!     Arc::new(NoOpTransport),
//!     Arc::new(stars),
//!     Arc::new(MemoryStore::new()),
//!     router,
//!     MessageTemplates::default(),
//!     GateTiming::default(),
//! );
//! assert_eq!(service.pending_count(), 0);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Recording/scripted port implementations.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// =============================================================================
// RE-EXPORTS
// =============================================================================

// Domain
pub use domain::{
    BindingRecord, GithubLogin, GroupId, InvalidLogin, InvalidRepoName, MessageTemplates,
    PendingChallenge, Privilege, Rejection, RepoName, RepoRouter, StoreError, TemplateArgs,
    TransportError, UserId,
};

// Ports
pub use ports::{
    BatchOperation, ChatTransport, InboundMessage, KeyValueStore, MembershipGate, RepoStatus,
    StarProbe, StarSource,
};

// Service
pub use service::{GateTiming, Ledger, VerificationService};

// Adapters
pub use adapters::{GithubConfig, GithubStarClient, MemoryStore, NoOpTransport};
