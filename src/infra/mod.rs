//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Third-party HTTP clients (postal code, geocoding, company registry, storage)
//! - Signed URL caching
//! - Unit of Work for repository access

pub mod cache;
pub mod clients;
pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use cache::SignedUrlCache;
pub use clients::{
    CompanyRegistry, GcsClient, Geocoder, NominatimClient, ObjectStorage, PostalCodeLookup,
    ReceitaWsClient, ViaCepClient,
};
pub use db::{Database, MigrationStatus, Migrator};
pub use repositories::{
    AddressRepository, DemandFilter, DemandRepository, DemandScope, ProductRepository,
    StoreRepository, UserRepository,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use clients::{MockCompanyRegistry, MockGeocoder, MockObjectStorage, MockPostalCodeLookup};
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAddressRepository, MockDemandRepository, MockProductRepository, MockStoreRepository,
    MockUserRepository,
};
