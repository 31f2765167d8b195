//! Organisation aggregate persistence.
//!
//! The store owns cascade semantics explicitly: every write runs in one
//! transaction, HR rows that fall out of the aggregate are deleted as orphans,
//! and deleting an organisation removes its contacts before the parent row.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, ModelTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::error::AppError;
use crate::models::aggregate::{Organisation, OrganisationHr};
use crate::models::{organisation, organisation_hr};

/// Persistence contract for the organisation aggregate.
#[async_trait]
pub trait OrganisationStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Organisation>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Organisation>, AppError>;

    /// Inserts when `id` is `None`, otherwise updates in place and reconciles
    /// the contact collection. Fails with a constraint violation before any
    /// write if the aggregate breaks a declared field constraint.
    async fn save(&self, organisation: Organisation) -> Result<Organisation, AppError>;

    async fn delete(&self, organisation: &Organisation) -> Result<(), AppError>;

    async fn delete_all(&self) -> Result<(), AppError>;
}

/// SeaORM-backed [`OrganisationStore`].
#[derive(Debug, Clone)]
pub struct OrganisationRepository {
    db: Arc<DatabaseConnection>,
}

impl OrganisationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrganisationStore for OrganisationRepository {
    async fn find_all(&self) -> Result<Vec<Organisation>, AppError> {
        let rows = organisation::Entity::find()
            .order_by_asc(organisation::Column::Id)
            .find_with_related(organisation_hr::Entity)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(model, contacts)| Organisation::from_models(model, contacts))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organisation>, AppError> {
        let Some(model) = organisation::Entity::find_by_id(id).one(&*self.db).await? else {
            return Ok(None);
        };

        let contacts = model
            .find_related(organisation_hr::Entity)
            .order_by_asc(organisation_hr::Column::Id)
            .all(&*self.db)
            .await?;

        Ok(Some(Organisation::from_models(model, contacts)))
    }

    async fn save(&self, organisation: Organisation) -> Result<Organisation, AppError> {
        let violations = organisation.constraint_violations();
        if !violations.is_empty() {
            return Err(AppError::ConstraintViolation(violations));
        }

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let saved = match organisation.id {
            None => insert_aggregate(&txn, organisation, now).await?,
            Some(id) => update_aggregate(&txn, id, organisation, now).await?,
        };

        txn.commit().await?;

        tracing::debug!(
            organisation_id = saved.id,
            contacts = saved.hr_contacts.len(),
            "Saved organisation aggregate"
        );
        Ok(saved)
    }

    async fn delete(&self, organisation: &Organisation) -> Result<(), AppError> {
        let Some(id) = organisation.id else {
            return Ok(());
        };

        let txn = self.db.begin().await?;

        let contacts = organisation_hr::Entity::delete_many()
            .filter(organisation_hr::Column::OrganisationId.eq(id))
            .exec(&txn)
            .await?;
        organisation::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::debug!(
            organisation_id = id,
            contacts_removed = contacts.rows_affected,
            "Deleted organisation aggregate"
        );
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        organisation_hr::Entity::delete_many().exec(&txn).await?;
        organisation::Entity::delete_many().exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }
}

async fn insert_aggregate(
    txn: &DatabaseTransaction,
    organisation: Organisation,
    now: DateTime<Utc>,
) -> Result<Organisation, AppError> {
    let model = organisation::ActiveModel {
        id: NotSet,
        name: Set(organisation.name),
        address: Set(organisation.address),
        city: Set(organisation.city),
        state: Set(organisation.state),
        country: Set(organisation.country),
        pincode: Set(organisation.pincode),
        website: Set(organisation.website),
        industry_type: Set(organisation.industry_type),
        created_at: Set(now),
        updated_at: Set(now),
        is_active: Set(organisation.is_active),
    }
    .insert(txn)
    .await?;

    let mut contacts = Vec::with_capacity(organisation.hr_contacts.len());
    for contact in organisation.hr_contacts {
        contacts.push(insert_contact(txn, model.id, contact, now).await?);
    }

    Ok(Organisation::from_models(model, contacts))
}

async fn update_aggregate(
    txn: &DatabaseTransaction,
    id: i64,
    organisation: Organisation,
    now: DateTime<Utc>,
) -> Result<Organisation, AppError> {
    let existing = organisation::Entity::find_by_id(id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Organisation not found".to_string()))?;

    let mut active = existing.into_active_model();
    active.name = Set(organisation.name);
    active.address = Set(organisation.address);
    active.city = Set(organisation.city);
    active.state = Set(organisation.state);
    active.country = Set(organisation.country);
    active.pincode = Set(organisation.pincode);
    active.website = Set(organisation.website);
    active.industry_type = Set(organisation.industry_type);
    active.is_active = Set(organisation.is_active);
    active.updated_at = Set(now);
    let model = active.update(txn).await?;

    let stored: HashSet<i64> = organisation_hr::Entity::find()
        .filter(organisation_hr::Column::OrganisationId.eq(id))
        .all(txn)
        .await?
        .into_iter()
        .map(|row| row.id)
        .collect();

    let retained: Vec<i64> = organisation
        .hr_contacts
        .iter()
        .filter_map(|contact| contact.id)
        .filter(|contact_id| stored.contains(contact_id))
        .collect();

    let mut orphans = organisation_hr::Entity::delete_many()
        .filter(organisation_hr::Column::OrganisationId.eq(id));
    if !retained.is_empty() {
        orphans = orphans.filter(organisation_hr::Column::Id.is_not_in(retained.clone()));
    }
    let removed = orphans.exec(txn).await?;
    if removed.rows_affected > 0 {
        tracing::debug!(
            organisation_id = id,
            removed = removed.rows_affected,
            "Removed orphaned HR contacts"
        );
    }

    let mut contacts = Vec::with_capacity(organisation.hr_contacts.len());
    for contact in organisation.hr_contacts {
        let saved = match contact.id {
            Some(contact_id) if retained.contains(&contact_id) => {
                update_contact(txn, contact_id, contact, now).await?
            }
            _ => insert_contact(txn, id, contact, now).await?,
        };
        contacts.push(saved);
    }

    Ok(Organisation::from_models(model, contacts))
}

async fn insert_contact(
    txn: &DatabaseTransaction,
    organisation_id: i64,
    contact: OrganisationHr,
    now: DateTime<Utc>,
) -> Result<organisation_hr::Model, AppError> {
    let model = organisation_hr::ActiveModel {
        id: NotSet,
        first_name: Set(contact.first_name),
        last_name: Set(contact.last_name),
        email: Set(contact.email),
        contact_number: Set(contact.contact_number),
        designation: Set(contact.designation),
        organisation_id: Set(organisation_id),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;
    Ok(model)
}

async fn update_contact(
    txn: &DatabaseTransaction,
    contact_id: i64,
    contact: OrganisationHr,
    now: DateTime<Utc>,
) -> Result<organisation_hr::Model, AppError> {
    let model = organisation_hr::ActiveModel {
        id: Set(contact_id),
        first_name: Set(contact.first_name),
        last_name: Set(contact.last_name),
        email: Set(contact.email),
        contact_number: Set(contact.contact_number),
        designation: Set(contact.designation),
        organisation_id: NotSet,
        created_at: NotSet,
        updated_at: Set(now),
    }
    .update(txn)
    .await?;
    Ok(model)
}
