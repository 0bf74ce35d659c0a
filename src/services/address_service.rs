//! Address service - postal addresses and their coordinates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    normalize_zip_code, Address, AddressDraft, Coordinates, CreateAddress, CurrentUser,
    UpdateAddress,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Geocoder, PostalCodeLookup, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

/// Address service trait for dependency injection.
#[async_trait]
pub trait AddressService: Send + Sync {
    /// Store a new address, geocoding it when the geocoder answers
    async fn create(&self, input: CreateAddress) -> AppResult<Address>;

    async fn get(&self, id: Uuid) -> AppResult<Address>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Address>>;

    /// Only admins, the owner of a store located here, or anyone while no
    /// store references the address may change it
    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateAddress,
    ) -> AppResult<Address>;

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Prefill address fields from a zip code
    async fn fresh_fill(&self, zip_code: String) -> AppResult<AddressDraft>;

    /// Coordinates of an address, geocoding and persisting them on first use
    async fn coordinates(&self, id: Uuid) -> AppResult<Coordinates>;
}

pub struct AddressManager<U: UnitOfWork> {
    uow: Arc<U>,
    postal_codes: Arc<dyn PostalCodeLookup>,
    geocoder: Arc<dyn Geocoder>,
}

impl<U: UnitOfWork> AddressManager<U> {
    pub fn new(
        uow: Arc<U>,
        postal_codes: Arc<dyn PostalCodeLookup>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            uow,
            postal_codes,
            geocoder,
        }
    }

    async fn ensure_address_access(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()> {
        if requester.is_admin() {
            return Ok(());
        }
        let stores = self.uow.stores().find_by_address(id).await?;
        if stores.is_empty() || stores.iter().any(|s| s.is_owned_by(requester.id)) {
            return Ok(());
        }

        tracing::warn!(user_id = %requester.id, address_id = %id, "Address access denied");
        Err(AppError::forbidden("Address belongs to another user's store"))
    }

    /// Geocoding failures leave the address without coordinates.
    async fn locate(&self, address: &Address) -> Option<Coordinates> {
        match self.geocoder.geocode(&address.geocoding_query()).await {
            Ok(coordinates) => Some(coordinates),
            Err(e) => {
                tracing::warn!(address_id = %address.id, error = %e, "Geocoding failed");
                None
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AddressService for AddressManager<U> {
    async fn create(&self, input: CreateAddress) -> AppResult<Address> {
        let mut address = Address::new(input)?;
        let coordinates = self.locate(&address).await;
        address.set_coordinates(coordinates);

        let address = self.uow.addresses().create(address).await?;
        tracing::info!(
            address_id = %address.id,
            geocoded = address.coordinates().is_some(),
            "Address created"
        );
        Ok(address)
    }

    async fn get(&self, id: Uuid) -> AppResult<Address> {
        self.uow
            .addresses()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Address")
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Address>> {
        let (addresses, total) = self.uow.addresses().list(params).await?;
        Ok(Paginated::new(addresses, params, total))
    }

    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateAddress,
    ) -> AppResult<Address> {
        let mut address = self.get(id).await?;
        self.ensure_address_access(requester, id).await?;
        if address.apply(changes)? {
            let coordinates = self.locate(&address).await;
            address.set_coordinates(coordinates);
        }
        self.uow.addresses().update(address).await
    }

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.get(id).await?;
        self.ensure_address_access(requester, id).await?;
        self.uow.addresses().delete(id).await?;
        tracing::info!(address_id = %id, "Address deactivated");
        Ok(())
    }

    async fn fresh_fill(&self, zip_code: String) -> AppResult<AddressDraft> {
        let zip_code = normalize_zip_code(&zip_code)?;
        self.postal_codes.lookup(&zip_code).await
    }

    async fn coordinates(&self, id: Uuid) -> AppResult<Coordinates> {
        let mut address = self.get(id).await?;
        if let Some(coordinates) = address.coordinates() {
            return Ok(coordinates);
        }

        let coordinates = self.geocoder.geocode(&address.geocoding_query()).await?;
        address.set_coordinates(Some(coordinates));
        self.uow.addresses().update(address).await?;
        Ok(coordinates)
    }
}
