//! Store database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{parse_column, Store};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cnpj: String,
    pub trade_name: String,
    pub legal_name: String,
    pub legal_phone_contact: Option<String>,
    pub preferred_phone_contact: Option<String>,
    pub legal_email_contact: Option<String>,
    pub preferred_email_contact: Option<String>,
    pub images: Vec<String>,
    pub reputation: f64,
    pub store_type: String,
    pub opening_date: Option<Date>,
    pub size: Option<String>,
    pub legal_nature: Option<String>,
    pub cnae_code: Option<String>,
    pub branch_classification: Option<String>,
    pub owner_id: Uuid,
    pub address_id: Uuid,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::AddressId",
        to = "super::address::Column::Id"
    )]
    Address,
    #[sea_orm(has_many = "super::demand::Entity")]
    Demands,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl Related<super::demand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Demands.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

soft_deletable!("Store");

impl TryFrom<Model> for Store {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Store {
            id: model.id,
            cnpj: model.cnpj,
            trade_name: model.trade_name,
            legal_name: model.legal_name,
            legal_phone_contact: model.legal_phone_contact,
            preferred_phone_contact: model.preferred_phone_contact,
            legal_email_contact: model.legal_email_contact,
            preferred_email_contact: model.preferred_email_contact,
            images: model.images,
            reputation: model.reputation,
            store_type: parse_column(&model.store_type, "stores.store_type")?,
            opening_date: model.opening_date,
            size: model.size,
            legal_nature: model.legal_nature,
            cnae_code: model.cnae_code,
            branch_classification: model.branch_classification,
            owner_id: model.owner_id,
            address_id: model.address_id,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Store> for ActiveModel {
    fn from(store: Store) -> Self {
        ActiveModel {
            id: Set(store.id),
            cnpj: Set(store.cnpj),
            trade_name: Set(store.trade_name),
            legal_name: Set(store.legal_name),
            legal_phone_contact: Set(store.legal_phone_contact),
            preferred_phone_contact: Set(store.preferred_phone_contact),
            legal_email_contact: Set(store.legal_email_contact),
            preferred_email_contact: Set(store.preferred_email_contact),
            images: Set(store.images),
            reputation: Set(store.reputation),
            store_type: Set(store.store_type.as_str().to_string()),
            opening_date: Set(store.opening_date),
            size: Set(store.size),
            legal_nature: Set(store.legal_nature),
            cnae_code: Set(store.cnae_code),
            branch_classification: Set(store.branch_classification),
            owner_id: Set(store.owner_id),
            address_id: Set(store.address_id),
            active: Set(store.active),
            created_at: Set(store.created_at),
            updated_at: Set(store.updated_at),
        }
    }
}
