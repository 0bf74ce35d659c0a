//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{parse_column, Product};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub unit_type: String,
    pub product_type: String,
    pub images: Vec<String>,
    pub search_name: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::demand::Entity")]
    Demands,
}

impl Related<super::demand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Demands.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

soft_deletable!("Product");

impl TryFrom<Model> for Product {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Product {
            id: model.id,
            name: model.name,
            unit_type: parse_column(&model.unit_type, "products.unit_type")?,
            product_type: parse_column(&model.product_type, "products.product_type")?,
            images: model.images,
            search_name: model.search_name,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            unit_type: Set(product.unit_type.as_str().to_string()),
            product_type: Set(product.product_type.as_str().to_string()),
            images: Set(product.images),
            search_name: Set(product.search_name),
            active: Set(product.active),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
    }
}
