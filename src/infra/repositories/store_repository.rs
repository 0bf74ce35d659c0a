//! Store repository.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::store::{self, ActiveModel, Entity as StoreEntity};
use crate::domain::Store;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;

    /// Active store registered under the given CNPJ digits
    async fn find_by_cnpj(&self, cnpj: &str) -> AppResult<Option<Store>>;

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Store>, u64)>;

    /// Active stores located at the given address
    async fn find_by_address(&self, address_id: Uuid) -> AppResult<Vec<Store>>;

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Store>, u64)>;

    async fn create(&self, store: Store) -> AppResult<Store>;

    async fn update(&self, store: Store) -> AppResult<Store>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct StoreStore {
    db: DatabaseConnection,
}

impl StoreStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<StoreEntity> for StoreStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<StoreEntity, ActiveModel> for StoreStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<StoreEntity> for StoreStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn into_stores(models: Vec<store::Model>) -> AppResult<Vec<Store>> {
    models.into_iter().map(Store::try_from).collect()
}

#[async_trait]
impl StoreRepository for StoreStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        self.find_active(id).await?.map(Store::try_from).transpose()
    }

    async fn find_by_cnpj(&self, cnpj: &str) -> AppResult<Option<Store>> {
        StoreEntity::find()
            .filter(store::Column::Cnpj.eq(cnpj))
            .filter(store::Column::Active.eq(true))
            .one(&self.db)
            .await?
            .map(Store::try_from)
            .transpose()
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Store>, u64)> {
        let (models, total) = self.find_active_page(params).await?;
        Ok((into_stores(models)?, total))
    }

    async fn find_by_address(&self, address_id: Uuid) -> AppResult<Vec<Store>> {
        let models = StoreEntity::find()
            .filter(store::Column::AddressId.eq(address_id))
            .filter(store::Column::Active.eq(true))
            .all(&self.db)
            .await?;
        into_stores(models)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Store>, u64)> {
        let query = StoreEntity::find().filter(store::Column::OwnerId.eq(owner_id));
        let (models, total) = self.paginate_active(query, params).await?;
        Ok((into_stores(models)?, total))
    }

    async fn create(&self, store: Store) -> AppResult<Store> {
        Store::try_from(self.insert_model(ActiveModel::from(store)).await?)
    }

    async fn update(&self, store: Store) -> AppResult<Store> {
        Store::try_from(self.update_model(ActiveModel::from(store)).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deactivate(id).await
    }
}
