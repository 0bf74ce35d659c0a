//! Demand database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{parse_column, Demand};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "demands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub product_id: Uuid,
    pub responsible_id: Uuid,
    pub needed_count: i32,
    pub minimum_count: i32,
    pub description: String,
    pub deadline: DateTimeUtc,
    pub status: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ResponsibleId",
        to = "super::user::Column::Id"
    )]
    Responsible,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

soft_deletable!("Demand");

impl TryFrom<Model> for Demand {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Demand {
            id: model.id,
            store_id: model.store_id,
            product_id: model.product_id,
            responsible_id: model.responsible_id,
            needed_count: model.needed_count,
            minimum_count: model.minimum_count,
            description: model.description,
            deadline: model.deadline,
            status: parse_column(&model.status, "demands.status")?,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Demand> for ActiveModel {
    fn from(demand: Demand) -> Self {
        ActiveModel {
            id: Set(demand.id),
            store_id: Set(demand.store_id),
            product_id: Set(demand.product_id),
            responsible_id: Set(demand.responsible_id),
            needed_count: Set(demand.needed_count),
            minimum_count: Set(demand.minimum_count),
            description: Set(demand.description),
            deadline: Set(demand.deadline),
            status: Set(demand.status.as_str().to_string()),
            active: Set(demand.active),
            created_at: Set(demand.created_at),
            updated_at: Set(demand.updated_at),
        }
    }
}
