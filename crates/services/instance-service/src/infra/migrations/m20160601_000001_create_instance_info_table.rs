//! Migration: Create the instance_info table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InstanceInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstanceInfo::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstanceInfo::InstanceInfoName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InstanceInfo::Description).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InstanceInfo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum InstanceInfo {
    Table,
    Id,
    InstanceInfoName,
    Description,
}
