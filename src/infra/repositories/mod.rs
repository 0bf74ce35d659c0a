//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod address_repository;
mod base;
mod demand_repository;
pub(crate) mod entities;
mod product_repository;
mod store_repository;
mod user_repository;

pub use address_repository::{AddressRepository, AddressStore};
pub use base::{DeleteRepository, ReadRepository, SoftDeletable, WriteRepository};
pub use demand_repository::{DemandFilter, DemandRepository, DemandScope, DemandStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use store_repository::{StoreRepository, StoreStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use address_repository::MockAddressRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use demand_repository::MockDemandRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use store_repository::MockStoreRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
