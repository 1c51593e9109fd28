//! Verification service construction and shared state.

use crate::domain::pending::PendingSet;
use crate::domain::routing::RepoRouter;
use crate::domain::templates::MessageTemplates;
use crate::ports::outbound::{ChatTransport, KeyValueStore, StarSource};
use crate::service::ledger::Ledger;
use std::sync::Arc;
use std::time::Duration;

/// Verification window and post-timeout grace period.
#[derive(Debug, Clone, Copy)]
pub struct GateTiming {
    /// Time a new member has to confirm before the timeout warning.
    pub verification_window: Duration,
    /// Time between the warning and the removal action.
    pub grace_period: Duration,
}

impl Default for GateTiming {
    fn default() -> Self {
        Self {
            verification_window: Duration::from_secs(300),
            grace_period: Duration::from_secs(60),
        }
    }
}

/// The verification coordinator.
///
/// Owns the pending-challenge set and orchestrates the ledger, the star
/// source, and the chat transport. All event entry points take `&self` and
/// may run concurrently; the pending set is the only shared mutable state.
pub struct VerificationService {
    pub(crate) transport: Arc<dyn ChatTransport>,
    pub(crate) stars: Arc<dyn StarSource>,
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) router: RepoRouter,
    pub(crate) templates: MessageTemplates,
    pub(crate) timing: GateTiming,
    pub(crate) pending: Arc<PendingSet>,
}

impl VerificationService {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        stars: Arc<dyn StarSource>,
        store: Arc<dyn KeyValueStore>,
        router: RepoRouter,
        templates: MessageTemplates,
        timing: GateTiming,
    ) -> Self {
        Self {
            transport,
            stars,
            ledger: Arc::new(Ledger::new(store)),
            router,
            templates,
            timing,
            pending: Arc::new(PendingSet::new()),
        }
    }

    /// The routing table this service was configured with.
    pub fn router(&self) -> &RepoRouter {
        &self.router
    }

    /// Direct access to the ledger, for wiring and reporting.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// Number of members currently mid-verification.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
