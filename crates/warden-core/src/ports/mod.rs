//! Port definitions: the inbound API trait and the outbound SPI traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{InboundMessage, MembershipGate, RepoStatus};
pub use outbound::{BatchOperation, ChatTransport, KeyValueStore, StarProbe, StarSource};
