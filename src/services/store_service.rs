//! Store service - business registrations owned by users.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::BUCKET_STORE_IMAGES;
use crate::domain::{
    normalize_cnpj, CreateStore, CurrentUser, Store, StoreDraft, UpdateStore,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{CompanyRegistry, ObjectStorage, UnitOfWork};
use crate::services::{ensure_store_access, take_image};
use crate::types::{Paginated, PaginationParams};

/// Store service trait for dependency injection.
///
/// Mutations are limited to the store owner or an admin.
#[async_trait]
pub trait StoreService: Send + Sync {
    async fn create(&self, requester: &CurrentUser, input: CreateStore) -> AppResult<Store>;

    async fn get(&self, id: Uuid) -> AppResult<Store>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Store>>;

    /// Stores owned by the requester
    async fn list_mine(
        &self,
        requester: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<Store>>;

    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateStore,
    ) -> AppResult<Store>;

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Prefill store fields from the company registry
    async fn fresh_fill(&self, cnpj: String) -> AppResult<StoreDraft>;

    async fn upload_image(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<Store>;

    async fn delete_image(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        index: usize,
    ) -> AppResult<Store>;
}

pub struct StoreManager<U: UnitOfWork> {
    uow: Arc<U>,
    registry: Arc<dyn CompanyRegistry>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> StoreManager<U> {
    pub fn new(
        uow: Arc<U>,
        registry: Arc<dyn CompanyRegistry>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            uow,
            registry,
            storage,
        }
    }

    async fn ensure_address_exists(&self, address_id: Uuid) -> AppResult<()> {
        self.uow
            .addresses()
            .find_by_id(address_id)
            .await?
            .ok_or_not_found("Address")
            .map(|_| ())
    }

    /// Load a store the requester is allowed to modify.
    async fn get_owned(&self, requester: &CurrentUser, id: Uuid) -> AppResult<Store> {
        let store = self.get(id).await?;
        ensure_store_access(requester, &store)?;
        Ok(store)
    }
}

#[async_trait]
impl<U: UnitOfWork> StoreService for StoreManager<U> {
    async fn create(&self, requester: &CurrentUser, input: CreateStore) -> AppResult<Store> {
        let owner_id = input.owner_id.unwrap_or(requester.id);
        if owner_id != requester.id && !requester.is_admin() {
            tracing::warn!(
                user_id = %requester.id,
                owner_id = %owner_id,
                "Store creation for another owner denied"
            );
            return Err(AppError::forbidden("Only admins can create stores for other users"));
        }

        self.uow
            .users()
            .find_by_id(owner_id)
            .await?
            .ok_or_not_found("Owner")?;
        self.ensure_address_exists(input.address_id).await?;

        let store = Store::new(input, owner_id)?;
        if self.uow.stores().find_by_cnpj(&store.cnpj).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Store with CNPJ {}",
                store.cnpj
            )));
        }

        let store = self.uow.stores().create(store).await?;
        tracing::info!(store_id = %store.id, owner_id = %owner_id, "Store created");
        Ok(store)
    }

    async fn get(&self, id: Uuid) -> AppResult<Store> {
        self.uow.stores().find_by_id(id).await?.ok_or_not_found("Store")
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Store>> {
        let (stores, total) = self.uow.stores().list(params).await?;
        Ok(Paginated::new(stores, params, total))
    }

    async fn list_mine(
        &self,
        requester: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<Store>> {
        let (stores, total) = self
            .uow
            .stores()
            .list_by_owner(requester.id, params)
            .await?;
        Ok(Paginated::new(stores, params, total))
    }

    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateStore,
    ) -> AppResult<Store> {
        let mut store = self.get_owned(requester, id).await?;
        if let Some(address_id) = changes.address_id {
            self.ensure_address_exists(address_id).await?;
        }
        store.apply(changes);
        self.uow.stores().update(store).await
    }

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.get_owned(requester, id).await?;
        self.uow.stores().delete(id).await?;
        tracing::info!(store_id = %id, user_id = %requester.id, "Store deactivated");
        Ok(())
    }

    async fn fresh_fill(&self, cnpj: String) -> AppResult<StoreDraft> {
        let cnpj = normalize_cnpj(&cnpj)?;
        self.registry.lookup(&cnpj).await
    }

    async fn upload_image(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<Store> {
        let mut store = self.get_owned(requester, id).await?;
        let blob_name = self
            .storage
            .upload(BUCKET_STORE_IMAGES, &file_name, bytes)
            .await?;
        store.images.push(blob_name);
        self.uow.stores().update(store).await
    }

    async fn delete_image(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        index: usize,
    ) -> AppResult<Store> {
        let mut store = self.get_owned(requester, id).await?;
        let blob_name = take_image(&mut store.images, index)?;
        let store = self.uow.stores().update(store).await?;

        if let Err(e) = self.storage.delete(BUCKET_STORE_IMAGES, &blob_name).await {
            tracing::warn!(store_id = %store.id, blob = %blob_name, error = %e, "Failed to delete store image");
        }
        Ok(store)
    }
}
