//! # Data Models
//!
//! SeaORM entities plus the API-facing organisation aggregate.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod aggregate;
pub mod oauth_state;
pub mod organisation;
pub mod organisation_hr;
pub mod session;

pub use aggregate::{HrContactPayload, Organisation, OrganisationHr, OrganisationPayload};
pub use oauth_state::Entity as OAuthState;
pub use session::Entity as Session;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "academicerp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Liveness report including database reachability
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "ok")]
    pub database: String,
}
