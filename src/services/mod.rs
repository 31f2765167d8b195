//! # Services
//!
//! Use-case logic sitting between HTTP handlers and repositories.

pub mod current_user;
pub mod oauth;
pub mod organisation;

pub use current_user::{CurrentUser, Principal};
pub use oauth::{AuthTokenResponse, OAuthExchangeService};
pub use organisation::OrganisationService;
