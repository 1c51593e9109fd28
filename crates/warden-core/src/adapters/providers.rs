//! Stand-in port implementations for wiring and headless operation.

use crate::domain::errors::TransportError;
use crate::domain::value_objects::{GroupId, Privilege, UserId};
use crate::ports::outbound::ChatTransport;
use async_trait::async_trait;
use tracing::debug;

/// Transport that performs no platform actions.
///
/// Used by headless deployments (sync/status runs) where no chat platform
/// is attached. Reports `Member` privilege, so a join notice routed here
/// never starts a challenge.
#[derive(Debug, Clone, Default)]
pub struct NoOpTransport;

#[async_trait]
impl ChatTransport for NoOpTransport {
    fn self_id(&self) -> UserId {
        UserId::new("star-warden")
    }

    fn mention(&self, user: &UserId) -> String {
        format!("@{user}")
    }

    async fn send_message(&self, group: &GroupId, text: &str) -> Result<(), TransportError> {
        debug!(group = %group, text, "message dropped (no transport attached)");
        Ok(())
    }

    async fn remove_member(&self, group: &GroupId, user: &UserId) -> Result<(), TransportError> {
        debug!(group = %group, user = %user, "removal dropped (no transport attached)");
        Err(TransportError::Unavailable("no transport attached".into()))
    }

    async fn member_display_name(
        &self,
        _group: &GroupId,
        user: &UserId,
    ) -> Result<String, TransportError> {
        Ok(user.as_str().to_string())
    }

    async fn self_privilege(&self, _group: &GroupId) -> Result<Privilege, TransportError> {
        Ok(Privilege::Member)
    }
}
