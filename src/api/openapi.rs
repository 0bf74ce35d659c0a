//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::extractors::ImageUploadForm;
use crate::api::handlers::{
    address_handler, auth_handler, demand_handler, product_handler, store_handler, user_handler,
};
use crate::domain::{
    AddressDraft, AddressResponse, Coordinates, CreateAddress, CreateDemand, CreateProduct,
    CreateStore, CreateUser, DemandResponse, DemandStatus, GenderType, PostResponse,
    ProductResponse, ProductType, StoreDraft, StoreResponse, StoreSummary, StoreType,
    UnitType, UpdateAddress, UpdateDemand, UpdateProduct, UpdateProfile, UpdateStore,
    UpdateUser, UserAccess, UserResponse, VerificationStatus,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the marketplace API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Stores publish product demands; suppliers find the ones nearby",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::login,
        user_handler::create_user,
        user_handler::sign_up,
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::update_profile,
        user_handler::delete_user,
        user_handler::upload_profile_picture,
        user_handler::get_profile_picture,
        address_handler::create_address,
        address_handler::list_addresses,
        address_handler::get_address,
        address_handler::update_address,
        address_handler::delete_address,
        address_handler::fresh_fill,
        address_handler::get_coordinates,
        store_handler::create_store,
        store_handler::list_stores,
        store_handler::list_my_stores,
        store_handler::get_store,
        store_handler::update_store,
        store_handler::delete_store,
        store_handler::fresh_fill,
        store_handler::upload_image,
        store_handler::delete_image,
        product_handler::create_product,
        product_handler::list_products,
        product_handler::search_products,
        product_handler::get_product,
        product_handler::update_product,
        product_handler::delete_product,
        product_handler::upload_image,
        product_handler::delete_image,
        demand_handler::create_demand,
        demand_handler::list_demands,
        demand_handler::list_by_store,
        demand_handler::get_demand,
        demand_handler::update_demand,
        demand_handler::delete_demand,
        demand_handler::reel_posts,
    ),
    components(
        schemas(
            UserAccess,
            GenderType,
            VerificationStatus,
            UserResponse,
            CreateUser,
            UpdateUser,
            UpdateProfile,
            AddressResponse,
            AddressDraft,
            CreateAddress,
            UpdateAddress,
            Coordinates,
            StoreType,
            StoreResponse,
            StoreSummary,
            StoreDraft,
            CreateStore,
            UpdateStore,
            UnitType,
            ProductType,
            ProductResponse,
            CreateProduct,
            UpdateProduct,
            DemandStatus,
            DemandResponse,
            PostResponse,
            CreateDemand,
            UpdateDemand,
            auth_handler::LoginRequest,
            TokenResponse,
            user_handler::ProfilePictureResponse,
            ImageUploadForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login"),
        (name = "Users", description = "Accounts and profiles"),
        (name = "Addresses", description = "Postal addresses and geocoding"),
        (name = "Stores", description = "Store registration"),
        (name = "Products", description = "Product catalog"),
        (name = "Demands", description = "Sourcing requests"),
        (name = "Reel", description = "Demand feed")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
