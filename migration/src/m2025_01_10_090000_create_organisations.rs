use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organisations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organisations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organisations::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Organisations::Address).string_len(100).null())
                    .col(ColumnDef::new(Organisations::City).string().null())
                    .col(ColumnDef::new(Organisations::State).string().null())
                    .col(ColumnDef::new(Organisations::Country).string().null())
                    .col(ColumnDef::new(Organisations::Pincode).string().null())
                    .col(ColumnDef::new(Organisations::Website).string().null())
                    .col(ColumnDef::new(Organisations::IndustryType).string().null())
                    .col(
                        ColumnDef::new(Organisations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Organisations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Organisations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Organisations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Organisations {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Country,
    Pincode,
    Website,
    IndustryType,
    CreatedAt,
    UpdatedAt,
    IsActive,
}
