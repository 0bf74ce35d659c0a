//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enum-like columns are stored as upper-case text.

/// Every table shares `id`, `active`, `created_at` and `updated_at`.
macro_rules! soft_deletable {
    ($label:literal) => {
        impl crate::infra::repositories::SoftDeletable for Entity {
            const LABEL: &'static str = $label;

            fn id_column() -> Column {
                Column::Id
            }

            fn active_column() -> Column {
                Column::Active
            }

            fn created_at_column() -> Column {
                Column::CreatedAt
            }

            fn updated_at_column() -> Column {
                Column::UpdatedAt
            }
        }
    };
}

pub mod address;
pub mod demand;
pub mod product;
pub mod store;
pub mod user;

pub use address::{ActiveModel as AddressActiveModel, Entity as AddressEntity, Model as AddressModel};
pub use demand::{ActiveModel as DemandActiveModel, Entity as DemandEntity, Model as DemandModel};
pub use product::{ActiveModel as ProductActiveModel, Entity as ProductEntity, Model as ProductModel};
pub use store::{ActiveModel as StoreActiveModel, Entity as StoreEntity, Model as StoreModel};
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
