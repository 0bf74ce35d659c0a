//! Migration: Create users, addresses, stores, products and demands.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Gender).string_len(32).not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string().null())
                    .col(ColumnDef::new(Users::ProfilePicture).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Access).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Users::VerificationStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(active_column(Users::Active))
                    .col(timestamp_column(Users::CreatedAt))
                    .col(timestamp_column(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Addresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Addresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Addresses::ZipCode).string_len(8).not_null())
                    .col(ColumnDef::new(Addresses::StreetAddress).string().not_null())
                    .col(ColumnDef::new(Addresses::Latitude).double().null())
                    .col(ColumnDef::new(Addresses::Longitude).double().null())
                    .col(ColumnDef::new(Addresses::Province).string().not_null())
                    .col(ColumnDef::new(Addresses::City).string().not_null())
                    .col(ColumnDef::new(Addresses::Neighbourhood).string().not_null())
                    .col(ColumnDef::new(Addresses::Number).string().not_null())
                    .col(ColumnDef::new(Addresses::AdditionalInfo).string().not_null())
                    .col(active_column(Addresses::Active))
                    .col(timestamp_column(Addresses::CreatedAt))
                    .col(timestamp_column(Addresses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stores::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stores::Cnpj).string_len(14).not_null())
                    .col(ColumnDef::new(Stores::TradeName).string().not_null())
                    .col(ColumnDef::new(Stores::LegalName).string().not_null())
                    .col(ColumnDef::new(Stores::LegalPhoneContact).string().null())
                    .col(ColumnDef::new(Stores::PreferredPhoneContact).string().null())
                    .col(ColumnDef::new(Stores::LegalEmailContact).string().null())
                    .col(ColumnDef::new(Stores::PreferredEmailContact).string().null())
                    .col(
                        ColumnDef::new(Stores::Images)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stores::Reputation)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Stores::StoreType).string_len(32).not_null())
                    .col(ColumnDef::new(Stores::OpeningDate).date().null())
                    .col(ColumnDef::new(Stores::Size).string().null())
                    .col(ColumnDef::new(Stores::LegalNature).string().null())
                    .col(ColumnDef::new(Stores::CnaeCode).string().null())
                    .col(ColumnDef::new(Stores::BranchClassification).string().null())
                    .col(ColumnDef::new(Stores::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Stores::AddressId).uuid().not_null())
                    .col(active_column(Stores::Active))
                    .col(timestamp_column(Stores::CreatedAt))
                    .col(timestamp_column(Stores::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stores_owner_id")
                            .from(Stores::Table, Stores::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stores_address_id")
                            .from(Stores::Table, Stores::AddressId)
                            .to(Addresses::Table, Addresses::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Products::UnitType).string_len(32).not_null())
                    .col(ColumnDef::new(Products::ProductType).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Products::Images)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::SearchName).string().not_null())
                    .col(active_column(Products::Active))
                    .col(timestamp_column(Products::CreatedAt))
                    .col(timestamp_column(Products::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Demands::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Demands::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Demands::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Demands::ProductId).uuid().not_null())
                    .col(ColumnDef::new(Demands::ResponsibleId).uuid().not_null())
                    .col(ColumnDef::new(Demands::NeededCount).integer().not_null())
                    .col(
                        ColumnDef::new(Demands::MinimumCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Demands::Description).string_len(512).not_null())
                    .col(
                        ColumnDef::new(Demands::Deadline)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Demands::Status).string_len(32).not_null())
                    .col(active_column(Demands::Active))
                    .col(timestamp_column(Demands::CreatedAt))
                    .col(timestamp_column(Demands::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_demands_store_id")
                            .from(Demands::Table, Demands::StoreId)
                            .to(Stores::Table, Stores::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_demands_product_id")
                            .from(Demands::Table, Demands::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_demands_responsible_id")
                            .from(Demands::Table, Demands::ResponsibleId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order
        manager
            .drop_table(Table::drop().table(Demands::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Addresses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

fn active_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .boolean()
        .not_null()
        .default(true)
        .to_owned()
}

fn timestamp_column<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Name,
    Email,
    DateOfBirth,
    Gender,
    PhoneNumber,
    ProfilePicture,
    PasswordHash,
    Access,
    VerificationStatus,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Addresses {
    Table,
    Id,
    ZipCode,
    StreetAddress,
    Latitude,
    Longitude,
    Province,
    City,
    Neighbourhood,
    Number,
    AdditionalInfo,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Stores {
    Table,
    Id,
    Cnpj,
    TradeName,
    LegalName,
    LegalPhoneContact,
    PreferredPhoneContact,
    LegalEmailContact,
    PreferredEmailContact,
    Images,
    Reputation,
    StoreType,
    OpeningDate,
    Size,
    LegalNature,
    CnaeCode,
    BranchClassification,
    OwnerId,
    AddressId,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Products {
    Table,
    Id,
    Name,
    UnitType,
    ProductType,
    Images,
    SearchName,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Demands {
    Table,
    Id,
    StoreId,
    ProductId,
    ResponsibleId,
    NeededCount,
    MinimumCount,
    Description,
    Deadline,
    Status,
    Active,
    CreatedAt,
    UpdatedAt,
}
