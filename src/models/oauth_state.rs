//! # OAuth State Model
//!
//! Single-use CSRF tokens issued when a login redirect starts.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "oauth_states")]
pub struct Model {
    /// Random state token echoed back by the provider
    #[sea_orm(primary_key, auto_increment = false)]
    pub state: String,

    /// Provider name (e.g., "google")
    pub provider: String,

    pub expires_at: DateTimeUtc,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
