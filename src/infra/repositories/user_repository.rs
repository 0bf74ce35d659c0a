//! User repository implementation with soft delete support.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Query methods only see active users unless stated otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find an active user by (lower-cased) email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// True when any row, active or not, already uses the email
    async fn email_taken(&self, email: &str) -> AppResult<bool>;

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn create(&self, user: User) -> AppResult<User>;

    async fn update(&self, user: User) -> AppResult<User>;

    /// Soft delete
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<UserEntity> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<UserEntity, ActiveModel> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<UserEntity> for UserStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_active(id).await?.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .filter(user::Column::Active.eq(true))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let (models, total) = self.find_active_page(params).await?;
        let users = models
            .into_iter()
            .map(User::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((users, total))
    }

    async fn create(&self, user: User) -> AppResult<User> {
        User::try_from(self.insert_model(ActiveModel::from(user)).await?)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        User::try_from(self.update_model(ActiveModel::from(user)).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deactivate(id).await
    }
}
