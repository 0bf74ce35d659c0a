//! Store handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{ImageUpload, ImageUploadForm, ValidatedJson};
use crate::api::middleware::{require_access, require_admin, STORE_ROLES};
use crate::api::AppState;
use crate::domain::{CreateStore, CurrentUser, StoreDraft, StoreResponse, UpdateStore};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CnpjQuery {
    /// CNPJ, formatted or digits only
    #[param(example = "11.222.333/0001-81")]
    pub cnpj: String,
}

pub fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stores).post(create_store))
        .route("/mine", get(list_my_stores))
        .route("/fresh-fill", get(fresh_fill))
        .route("/:id", get(get_store).put(update_store).delete(delete_store))
        .route("/:id/images", post(upload_image))
        .route("/:id/images/:index", delete(delete_image))
}

/// Register a store; the owner defaults to the caller
#[utoipa::path(
    post,
    path = "/store",
    tag = "Stores",
    security(("bearer_auth" = [])),
    request_body = CreateStore,
    responses(
        (status = 201, description = "Store created", body = StoreResponse),
        (status = 400, description = "Invalid CNPJ or validation error"),
        (status = 403, description = "Only admins can create stores for other users"),
        (status = 404, description = "Owner or address not found"),
        (status = 409, description = "CNPJ already registered")
    )
)]
pub async fn create_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStore>,
) -> AppResult<Created<StoreResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let store = state.store_service.create(&current_user, payload).await?;
    Ok(Created::new(StoreResponse::from(store), "Store created"))
}

/// List all stores (admin only)
#[utoipa::path(
    get,
    path = "/store",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of stores", body = Vec<StoreResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_stores(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<StoreResponse>>> {
    require_admin(&current_user)?;
    let stores = state.store_service.list(params).await?;
    Ok(ApiResponse::new(stores.map(StoreResponse::from), "Stores listed"))
}

/// Stores owned by the caller
#[utoipa::path(
    get,
    path = "/store/mine",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of the caller's stores", body = Vec<StoreResponse>)
    )
)]
pub async fn list_my_stores(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<StoreResponse>>> {
    require_access(&current_user, STORE_ROLES)?;
    let stores = state.store_service.list_mine(&current_user, params).await?;
    Ok(ApiResponse::new(stores.map(StoreResponse::from), "Stores listed"))
}

#[utoipa::path(
    get,
    path = "/store/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store", body = StoreResponse),
        (status = 404, description = "Store not found")
    )
)]
pub async fn get_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<StoreResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let store = state.store_service.get(id).await?;
    Ok(ApiResponse::new(StoreResponse::from(store), "Store found"))
}

#[utoipa::path(
    put,
    path = "/store/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body = UpdateStore,
    responses(
        (status = 200, description = "Store updated", body = StoreResponse),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn update_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateStore>,
) -> AppResult<ApiResponse<StoreResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let store = state.store_service.update(&current_user, id, payload).await?;
    Ok(ApiResponse::new(StoreResponse::from(store), "Store updated"))
}

#[utoipa::path(
    delete,
    path = "/store/{id}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    responses(
        (status = 200, description = "Store deleted"),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn delete_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_access(&current_user, STORE_ROLES)?;
    state.store_service.delete(&current_user, id).await?;
    Ok(ApiResponse::message("Store deleted"))
}

/// Prefill store fields from the company registry
#[utoipa::path(
    get,
    path = "/store/fresh-fill",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(CnpjQuery),
    responses(
        (status = 200, description = "Registry data for the CNPJ", body = StoreDraft),
        (status = 400, description = "Invalid CNPJ"),
        (status = 417, description = "Company registry failure")
    )
)]
pub async fn fresh_fill(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<CnpjQuery>,
) -> AppResult<ApiResponse<StoreDraft>> {
    require_access(&current_user, STORE_ROLES)?;
    let draft = state.store_service.fresh_fill(query.cnpj).await?;
    Ok(ApiResponse::new(draft, "Store fields found"))
}

#[utoipa::path(
    post,
    path = "/store/{id}/images",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Store ID")),
    request_body(
        content = ImageUploadForm,
        content_type = "multipart/form-data",
        description = "Image file (jpg, jpeg, png, webp)"
    ),
    responses(
        (status = 201, description = "Image appended", body = StoreResponse),
        (status = 403, description = "Not the store owner"),
        (status = 417, description = "Object storage failure")
    )
)]
pub async fn upload_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    upload: ImageUpload,
) -> AppResult<Created<StoreResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let store = state
        .store_service
        .upload_image(&current_user, id, upload.file_name, upload.bytes)
        .await?;
    Ok(Created::new(StoreResponse::from(store), "Store image uploaded"))
}

#[utoipa::path(
    delete,
    path = "/store/{id}/images/{index}",
    tag = "Stores",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Store ID"),
        ("index" = usize, Path, description = "Position in the image list")
    ),
    responses(
        (status = 200, description = "Image removed", body = StoreResponse),
        (status = 404, description = "Store or image not found")
    )
)]
pub async fn delete_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> AppResult<ApiResponse<StoreResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let store = state
        .store_service
        .delete_image(&current_user, id, index)
        .await?;
    Ok(ApiResponse::new(StoreResponse::from(store), "Store image deleted"))
}
