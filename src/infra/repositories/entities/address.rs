//! Address database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::Address;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "addresses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub zip_code: String,
    pub street_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub province: String,
    pub city: String,
    pub neighbourhood: String,
    pub number: String,
    pub additional_info: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::store::Entity")]
    Stores,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

soft_deletable!("Address");

impl From<Model> for Address {
    fn from(model: Model) -> Self {
        Address {
            id: model.id,
            zip_code: model.zip_code,
            street_address: model.street_address,
            latitude: model.latitude,
            longitude: model.longitude,
            province: model.province,
            city: model.city,
            neighbourhood: model.neighbourhood,
            number: model.number,
            additional_info: model.additional_info,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Address> for ActiveModel {
    fn from(address: Address) -> Self {
        ActiveModel {
            id: Set(address.id),
            zip_code: Set(address.zip_code),
            street_address: Set(address.street_address),
            latitude: Set(address.latitude),
            longitude: Set(address.longitude),
            province: Set(address.province),
            city: Set(address.city),
            neighbourhood: Set(address.neighbourhood),
            number: Set(address.number),
            additional_info: Set(address.additional_info),
            active: Set(address.active),
            created_at: Set(address.created_at),
            updated_at: Set(address.updated_at),
        }
    }
}
