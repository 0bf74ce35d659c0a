//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! marketplace concepts independent of infrastructure concerns.
//!
//! Contains: Entities, Value Objects, input DTOs and response shapes.

/// Declares a closed set of upper-case text values shared by the API,
/// the database columns and the OpenAPI schema.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(crate::errors::AppError::validation(format!(
                        "Unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod address;
pub mod demand;
pub mod geo;
pub mod password;
pub mod product;
pub mod store;
pub mod user;

pub use address::{
    normalize_zip_code, Address, AddressDraft, AddressResponse, CreateAddress, UpdateAddress,
};
pub use demand::{CreateDemand, Demand, DemandResponse, DemandStatus, PostResponse, UpdateDemand};
pub use geo::{haversine_distance_meters, Coordinates};
pub use password::Password;
pub use product::{CreateProduct, Product, ProductResponse, ProductType, UnitType, UpdateProduct};
pub use store::{
    normalize_cnpj, CreateStore, Store, StoreDraft, StoreResponse, StoreSummary, StoreType,
    UpdateStore,
};
pub use user::{
    CreateUser, CurrentUser, GenderType, SignUp, UpdateProfile, UpdateUser, User, UserAccess,
    UserResponse, VerificationStatus,
};

/// Parse a text column into its domain enum, surfacing corrupt rows as internal errors.
pub(crate) fn parse_column<T>(value: &str, column: &str) -> crate::errors::AppResult<T>
where
    T: std::str::FromStr<Err = crate::errors::AppError>,
{
    value
        .parse()
        .map_err(|_| crate::errors::AppError::internal(format!("Corrupt {} value '{}'", column, value)))
}
