//! Migration: Add indexes for active-row filtering and common lookups.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_marketplace_tables::{Demands, Products, Stores};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, columns)
fn indexes() -> Vec<(&'static str, DynIden, Vec<DynIden>)> {
    vec![
        (
            "idx_stores_owner_active",
            Stores::Table.into_iden(),
            vec![Stores::OwnerId.into_iden(), Stores::Active.into_iden()],
        ),
        (
            "idx_stores_cnpj",
            Stores::Table.into_iden(),
            vec![Stores::Cnpj.into_iden()],
        ),
        (
            "idx_products_search_name",
            Products::Table.into_iden(),
            vec![Products::SearchName.into_iden()],
        ),
        (
            "idx_demands_store_active",
            Demands::Table.into_iden(),
            vec![Demands::StoreId.into_iden(), Demands::Active.into_iden()],
        ),
        (
            "idx_demands_status",
            Demands::Table.into_iden(),
            vec![Demands::Status.into_iden()],
        ),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, columns) in indexes() {
            let mut index = Index::create();
            index.name(name).table(table).if_not_exists();
            for column in columns {
                index.col(column);
            }
            manager.create_index(index.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in indexes().into_iter().rev() {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}
