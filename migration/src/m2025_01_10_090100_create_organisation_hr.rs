use sea_orm_migration::prelude::*;

use crate::m2025_01_10_090000_create_organisations::Organisations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganisationHr::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganisationHr::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrganisationHr::FirstName)
                            .string_len(25)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrganisationHr::LastName).string_len(25).null())
                    .col(ColumnDef::new(OrganisationHr::Email).string_len(50).not_null())
                    .col(
                        ColumnDef::new(OrganisationHr::ContactNumber)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrganisationHr::Designation).string().null())
                    .col(
                        ColumnDef::new(OrganisationHr::OrganisationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganisationHr::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OrganisationHr::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organisation_hr_organisation")
                            .from(OrganisationHr::Table, OrganisationHr::OrganisationId)
                            .to(Organisations::Table, Organisations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_organisation_hr_organisation_id")
                    .table(OrganisationHr::Table)
                    .col(OrganisationHr::OrganisationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganisationHr::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganisationHr {
    #[sea_orm(iden = "organisation_hr")]
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    ContactNumber,
    Designation,
    OrganisationId,
    CreatedAt,
    UpdatedAt,
}
