use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create products table. The sku is externally assigned, so it
        // doubles as the primary key; attributes are stored as JSONB.
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Sku)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string_null(Products::ParentSku))
                    .col(string_null(Products::Title))
                    .col(string_null(Products::CategoryCode))
                    .col(string_null(Products::CategoryName))
                    .col(text_null(Products::Description))
                    .col(text_null(Products::ShortDescription))
                    .col(boolean_null(Products::IsPublished))
                    .col(json_binary_null(Products::Attributes))
                    .to_owned(),
            )
            .await?;

        // Listing filters by category_code
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_category_code")
                    .table(Products::Table)
                    .col(Products::CategoryCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Sku,
    ParentSku,
    Title,
    CategoryCode,
    CategoryName,
    Description,
    ShortDescription,
    IsPublished,
    Attributes,
}
