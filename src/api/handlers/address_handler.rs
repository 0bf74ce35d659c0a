//! Address handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_access, require_admin, STORE_ROLES};
use crate::api::AppState;
use crate::domain::{
    AddressDraft, AddressResponse, Coordinates, CreateAddress, CurrentUser, UpdateAddress,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreshFillQuery {
    /// Brazilian zip code, with or without the dash
    #[param(example = "01310-100")]
    pub cep: String,
}

pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_addresses).post(create_address))
        .route("/fresh-fill", get(fresh_fill))
        .route(
            "/:id",
            get(get_address).put(update_address).delete(delete_address),
        )
        .route("/:id/coordinates", get(get_coordinates))
}

#[utoipa::path(
    post,
    path = "/address",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    request_body = CreateAddress,
    responses(
        (status = 201, description = "Address created, geocoded when possible", body = AddressResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAddress>,
) -> AppResult<Created<AddressResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let address = state.address_service.create(payload).await?;
    Ok(Created::new(AddressResponse::from(address), "Address created"))
}

/// List all addresses (admin only)
#[utoipa::path(
    get,
    path = "/address",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of addresses", body = Vec<AddressResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_addresses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<AddressResponse>>> {
    require_admin(&current_user)?;
    let addresses = state.address_service.list(params).await?;
    Ok(ApiResponse::new(
        addresses.map(AddressResponse::from),
        "Addresses listed",
    ))
}

#[utoipa::path(
    get,
    path = "/address/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address", body = AddressResponse),
        (status = 404, description = "Address not found")
    )
)]
pub async fn get_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<AddressResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let address = state.address_service.get(id).await?;
    Ok(ApiResponse::new(AddressResponse::from(address), "Address found"))
}

#[utoipa::path(
    put,
    path = "/address/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body = UpdateAddress,
    responses(
        (status = 200, description = "Address updated", body = AddressResponse),
        (status = 403, description = "Address belongs to another user's store"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn update_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAddress>,
) -> AppResult<ApiResponse<AddressResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let address = state.address_service.update(&current_user, id, payload).await?;
    Ok(ApiResponse::new(AddressResponse::from(address), "Address updated"))
}

#[utoipa::path(
    delete,
    path = "/address/{id}",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address deleted"),
        (status = 403, description = "Address belongs to another user's store"),
        (status = 404, description = "Address not found")
    )
)]
pub async fn delete_address(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_access(&current_user, STORE_ROLES)?;
    state.address_service.delete(&current_user, id).await?;
    Ok(ApiResponse::message("Address deleted"))
}

/// Prefill address fields from a zip code
#[utoipa::path(
    get,
    path = "/address/fresh-fill",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(FreshFillQuery),
    responses(
        (status = 200, description = "Address fields for the zip code", body = AddressDraft),
        (status = 400, description = "Malformed zip code"),
        (status = 404, description = "Zip code not found"),
        (status = 417, description = "Postal code service failure")
    )
)]
pub async fn fresh_fill(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<FreshFillQuery>,
) -> AppResult<ApiResponse<AddressDraft>> {
    require_access(&current_user, STORE_ROLES)?;
    let draft = state.address_service.fresh_fill(query.cep).await?;
    Ok(ApiResponse::new(draft, "Address fields found"))
}

/// Approximate coordinates of a stored address
#[utoipa::path(
    get,
    path = "/address/{id}/coordinates",
    tag = "Addresses",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Coordinates", body = Coordinates),
        (status = 404, description = "Address not found or not geocodable"),
        (status = 417, description = "Geocoding service failure")
    )
)]
pub async fn get_coordinates(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<Coordinates>> {
    require_access(&current_user, STORE_ROLES)?;
    let coordinates = state.address_service.coordinates(id).await?;
    Ok(ApiResponse::new(coordinates, "Coordinates found"))
}
