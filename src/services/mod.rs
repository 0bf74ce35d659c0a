//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Repositories are reached through the Unit of Work; third-party systems
//! through the client traits in `infra::clients`.

mod address_service;
mod auth_service;
pub mod container;
mod demand_service;
mod product_service;
mod store_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use address_service::{AddressManager, AddressService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use demand_service::{DemandListQuery, DemandManager, DemandService};
pub use product_service::{ProductManager, ProductService};
pub use store_service::{StoreManager, StoreService};
pub use user_service::{UserManager, UserService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

use crate::domain::{CurrentUser, Store};
use crate::errors::{AppError, AppResult};

/// Only the store owner or an admin may act on a store and its demands.
pub(crate) fn ensure_store_access(requester: &CurrentUser, store: &Store) -> AppResult<()> {
    if requester.is_admin() || store.is_owned_by(requester.id) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = %requester.id,
            store_id = %store.id,
            "Store access denied"
        );
        Err(AppError::forbidden("User has no access to the requested store"))
    }
}

/// Remove the image at `index`, returning its blob name.
pub(crate) fn take_image(images: &mut Vec<String>, index: usize) -> AppResult<String> {
    if index >= images.len() {
        return Err(AppError::not_found("Image"));
    }
    Ok(images.remove(index))
}
