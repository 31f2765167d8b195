//! # Session Repository
//!
//! Server-side login sessions. The cookie carries only the opaque id; the
//! authenticated principal lives in the row.

use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;

use crate::models::session::{self, ActiveModel, Entity, Model};
use crate::services::current_user::Principal;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error("stored principal could not be decoded: {0}")]
    Principal(#[from] serde_json::Error),
}

pub struct SessionRepository {
    db: Arc<DatabaseConnection>,
}

impl SessionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Store a new session for `principal` under the token `id`.
    pub async fn create(
        &self,
        id: &str,
        principal: &Principal,
        ttl_minutes: i64,
    ) -> Result<Model, SessionError> {
        let now = Utc::now();
        let model = Model {
            id: id.to_string(),
            principal: serde_json::to_string(principal)?,
            expires_at: now + Duration::minutes(ttl_minutes),
            created_at: now,
        };

        Entity::insert(ActiveModel {
            id: Set(model.id.clone()),
            principal: Set(model.principal.clone()),
            expires_at: Set(model.expires_at),
            created_at: Set(model.created_at),
        })
        .exec_without_returning(&*self.db)
        .await?;

        Ok(model)
    }

    /// Resolve an unexpired session to its principal.
    pub async fn find_principal(&self, id: &str) -> Result<Option<Principal>, SessionError> {
        let found = Entity::find_by_id(id.to_string())
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(&*self.db)
            .await?;

        match found {
            Some(model) => Ok(Some(serde_json::from_str(&model.principal)?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool, SessionError> {
        let result = Entity::delete_by_id(id.to_string())
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn cleanup_expired(&self) -> Result<u64, SessionError> {
        let result = Entity::delete_many()
            .filter(session::Column::ExpiresAt.lt(Utc::now()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
