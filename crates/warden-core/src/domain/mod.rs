//! Domain layer: identifiers, records, routing, templates, and the pending
//! set. Pure logic only; the network and the store live behind ports.

pub mod entities;
pub mod errors;
pub mod pending;
pub mod routing;
pub mod templates;
pub mod value_objects;

pub use entities::{BindingRecord, PendingChallenge};
pub use errors::{Rejection, StoreError, TransportError};
pub use pending::PendingSet;
pub use routing::RepoRouter;
pub use templates::{MessageTemplates, TemplateArgs};
pub use value_objects::{
    GithubLogin, GroupId, InvalidLogin, InvalidRepoName, Privilege, RepoName, UserId,
    MAX_LOGIN_LEN,
};
