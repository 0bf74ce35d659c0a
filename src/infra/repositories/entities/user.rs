//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{parse_column, User};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub date_of_birth: Option<Date>,
    pub gender: String,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub password_hash: String,
    pub access: String,
    pub verification_status: String,
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

soft_deletable!("User");

impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            date_of_birth: model.date_of_birth,
            gender: parse_column(&model.gender, "users.gender")?,
            phone_number: model.phone_number,
            profile_picture: model.profile_picture,
            password_hash: model.password_hash,
            access: parse_column(&model.access, "users.access")?,
            verification_status: parse_column(
                &model.verification_status,
                "users.verification_status",
            )?,
            active: model.active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            date_of_birth: Set(user.date_of_birth),
            gender: Set(user.gender.as_str().to_string()),
            phone_number: Set(user.phone_number),
            profile_picture: Set(user.profile_picture),
            password_hash: Set(user.password_hash),
            access: Set(user.access.as_str().to_string()),
            verification_status: Set(user.verification_status.as_str().to_string()),
            active: Set(user.active),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
