//! # OAuth State Repository
//!
//! Issues and consumes the single-use `state` tokens that guard the login
//! redirect against CSRF.

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;

use crate::models::oauth_state::{self, ActiveModel, Entity, Model};

/// Repository for OAuth state database operations
pub struct OAuthStateRepository {
    db: Arc<DatabaseConnection>,
}

impl OAuthStateRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Persist a freshly generated state token.
    pub async fn create(
        &self,
        provider: &str,
        state: &str,
        expires_in_minutes: i64,
    ) -> Result<Model, sea_orm::DbErr> {
        let now = Utc::now();
        let model = Model {
            state: state.to_string(),
            provider: provider.to_string(),
            expires_at: now + Duration::minutes(expires_in_minutes),
            created_at: now,
        };

        // String primary key: skip the RETURNING/last-insert-id round trip.
        Entity::insert(ActiveModel {
            state: Set(model.state.clone()),
            provider: Set(model.provider.clone()),
            expires_at: Set(model.expires_at),
            created_at: Set(model.created_at),
        })
        .exec_without_returning(&*self.db)
        .await?;

        Ok(model)
    }

    /// Returns the state if it exists and has not expired, deleting it either way
    /// so it cannot be replayed.
    pub async fn find_and_consume(
        &self,
        provider: &str,
        state: &str,
    ) -> Result<Option<Model>, sea_orm::DbErr> {
        let found = Entity::find_by_id(state.to_string())
            .filter(oauth_state::Column::Provider.eq(provider))
            .one(&*self.db)
            .await?;

        let Some(found) = found else {
            return Ok(None);
        };

        if !self.claim(&found).await? {
            tracing::debug!(provider, "OAuth state already consumed");
            return Ok(None);
        }

        if found.expires_at <= Utc::now() {
            tracing::debug!(provider, "Rejected expired OAuth state");
            return Ok(None);
        }

        Ok(Some(found))
    }

    /// Deletes a looked-up state row. Only the caller whose delete removed the
    /// row gets `true`; a concurrent consumer of the same state gets `false`.
    pub async fn claim(&self, found: &Model) -> Result<bool, sea_orm::DbErr> {
        let result = Entity::delete_by_id(found.state.clone())
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Clean up expired OAuth states
    pub async fn cleanup_expired(&self) -> Result<u64, sea_orm::DbErr> {
        let result = Entity::delete_many()
            .filter(oauth_state::Column::ExpiresAt.lt(Utc::now()))
            .exec(&*self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
