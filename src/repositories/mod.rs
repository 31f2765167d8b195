//! # Repository Layer
//!
//! Repositories encapsulate SeaORM operations; handlers and services never
//! touch entities directly.

pub mod oauth_state;
pub mod organisation;
pub mod session;

pub use oauth_state::OAuthStateRepository;
pub use organisation::{OrganisationRepository, OrganisationStore};
pub use session::{SessionError, SessionRepository};
