//! # Organisation Entity
//!
//! Root row of the organisation aggregate. HR contacts reference it through
//! `organisation_hr.organisation_id`.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "organisations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub website: Option<String>,
    pub industry_type: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::organisation_hr::Entity")]
    HrContacts,
}

impl Related<super::organisation_hr::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HrContacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
