//! Product handlers. Reads are open to any authenticated user.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{ImageUpload, ImageUploadForm, ValidatedJson};
use crate::api::middleware::require_admin;
use crate::api::AppState;
use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{CreateProduct, CurrentUser, ProductResponse, ProductType, UpdateProduct};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductSearchQuery {
    /// Substring of the searchable name, case-insensitive
    #[param(example = "arroz")]
    pub name: String,
    pub product_type: Option<ProductType>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/images", post(upload_image))
        .route("/:id/images/:index", delete(delete_image))
}

/// Add a catalog product (admin only)
#[utoipa::path(
    post,
    path = "/product",
    tag = "Products",
    security(("bearer_auth" = [])),
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProduct>,
) -> AppResult<Created<ProductResponse>> {
    require_admin(&current_user)?;
    let product = state.product_service.create(payload).await?;
    Ok(Created::new(ProductResponse::from(product), "Product created"))
}

#[utoipa::path(
    get,
    path = "/product",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of products", body = Vec<ProductResponse>)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<ProductResponse>>> {
    let products = state.product_service.list(params).await?;
    Ok(ApiResponse::new(
        products.map(ProductResponse::from),
        "Products listed",
    ))
}

/// Search products by name and type
#[utoipa::path(
    get,
    path = "/product/search",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(ProductSearchQuery),
    responses(
        (status = 200, description = "Matching products", body = Vec<ProductResponse>),
        (status = 400, description = "Empty search name")
    )
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> AppResult<ApiResponse<Paginated<ProductResponse>>> {
    let params = PaginationParams::new(query.page, query.per_page);
    let products = state
        .product_service
        .search(query.name, query.product_type, params)
        .await?;
    Ok(ApiResponse::new(
        products.map(ProductResponse::from),
        "Products found",
    ))
}

#[utoipa::path(
    get,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = ProductResponse),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<ProductResponse>> {
    let product = state.product_service.get(id).await?;
    Ok(ApiResponse::new(ProductResponse::from(product), "Product found"))
}

#[utoipa::path(
    put,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProduct>,
) -> AppResult<ApiResponse<ProductResponse>> {
    require_admin(&current_user)?;
    let product = state.product_service.update(id, payload).await?;
    Ok(ApiResponse::new(ProductResponse::from(product), "Product updated"))
}

#[utoipa::path(
    delete,
    path = "/product/{id}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&current_user)?;
    state.product_service.delete(id).await?;
    Ok(ApiResponse::message("Product deleted"))
}

#[utoipa::path(
    post,
    path = "/product/{id}/images",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(
        content = ImageUploadForm,
        content_type = "multipart/form-data",
        description = "Image file (jpg, jpeg, png, webp)"
    ),
    responses(
        (status = 201, description = "Image appended", body = ProductResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 417, description = "Object storage failure")
    )
)]
pub async fn upload_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    upload: ImageUpload,
) -> AppResult<Created<ProductResponse>> {
    require_admin(&current_user)?;
    let product = state
        .product_service
        .upload_image(id, upload.file_name, upload.bytes)
        .await?;
    Ok(Created::new(ProductResponse::from(product), "Product image uploaded"))
}

#[utoipa::path(
    delete,
    path = "/product/{id}/images/{index}",
    tag = "Products",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("index" = usize, Path, description = "Position in the image list")
    ),
    responses(
        (status = 200, description = "Image removed", body = ProductResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Product or image not found")
    )
)]
pub async fn delete_image(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> AppResult<ApiResponse<ProductResponse>> {
    require_admin(&current_user)?;
    let product = state.product_service.delete_image(id, index).await?;
    Ok(ApiResponse::new(ProductResponse::from(product), "Product image deleted"))
}
