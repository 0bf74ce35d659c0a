//! Demand handlers and the reel feed.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_access, require_admin, STORE_ROLES};
use crate::api::AppState;
use crate::domain::{CreateDemand, CurrentUser, DemandResponse, PostResponse, UpdateDemand};
use crate::errors::AppResult;
use crate::services::DemandListQuery;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

pub fn demand_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_demands).post(create_demand))
        .route("/list-by-store", get(list_by_store))
        .route(
            "/:id",
            get(get_demand).put(update_demand).delete(delete_demand),
        )
}

pub fn reel_routes() -> Router<AppState> {
    Router::new().route("/posts", get(reel_posts))
}

/// Publish a demand for one of the caller's stores
#[utoipa::path(
    post,
    path = "/demand",
    tag = "Demands",
    security(("bearer_auth" = [])),
    request_body = CreateDemand,
    responses(
        (status = 201, description = "Demand created", body = DemandResponse),
        (status = 400, description = "Invalid counts or validation error"),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Store, product or responsible user not found")
    )
)]
pub async fn create_demand(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDemand>,
) -> AppResult<Created<DemandResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let demand = state.demand_service.create(&current_user, payload).await?;
    Ok(Created::new(demand, "Demand created"))
}

/// List every demand (admin only)
#[utoipa::path(
    get,
    path = "/demand",
    tag = "Demands",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of demands", body = Vec<DemandResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_demands(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<DemandResponse>>> {
    require_admin(&current_user)?;
    let demands = state.demand_service.list(params).await?;
    Ok(ApiResponse::new(demands, "Demands listed"))
}

/// Demands relevant to a store: its own for retailers, nearby ones for suppliers
#[utoipa::path(
    get,
    path = "/demand/list-by-store",
    tag = "Demands",
    security(("bearer_auth" = [])),
    params(DemandListQuery),
    responses(
        (status = 200, description = "Page of demands", body = Vec<DemandResponse>),
        (status = 400, description = "Supplier address without coordinates or invalid radius"),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn list_by_store(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<DemandListQuery>,
) -> AppResult<ApiResponse<Paginated<DemandResponse>>> {
    require_access(&current_user, STORE_ROLES)?;
    let demands = state
        .demand_service
        .list_by_store(&current_user, query)
        .await?;
    Ok(ApiResponse::new(demands, "Demands listed"))
}

#[utoipa::path(
    get,
    path = "/demand/{id}",
    tag = "Demands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Demand ID")),
    responses(
        (status = 200, description = "Demand", body = DemandResponse),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Demand not found")
    )
)]
pub async fn get_demand(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<DemandResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let demand = state.demand_service.get(&current_user, id).await?;
    Ok(ApiResponse::new(demand, "Demand found"))
}

#[utoipa::path(
    put,
    path = "/demand/{id}",
    tag = "Demands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Demand ID")),
    request_body = UpdateDemand,
    responses(
        (status = 200, description = "Demand updated", body = DemandResponse),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Demand not found")
    )
)]
pub async fn update_demand(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDemand>,
) -> AppResult<ApiResponse<DemandResponse>> {
    require_access(&current_user, STORE_ROLES)?;
    let demand = state
        .demand_service
        .update(&current_user, id, payload)
        .await?;
    Ok(ApiResponse::new(demand, "Demand updated"))
}

#[utoipa::path(
    delete,
    path = "/demand/{id}",
    tag = "Demands",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Demand ID")),
    responses(
        (status = 200, description = "Demand deleted"),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Demand not found")
    )
)]
pub async fn delete_demand(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_access(&current_user, STORE_ROLES)?;
    state.demand_service.delete(&current_user, id).await?;
    Ok(ApiResponse::message("Demand deleted"))
}

/// Feed cards for a store, product images signed
#[utoipa::path(
    get,
    path = "/reel/posts",
    tag = "Reel",
    security(("bearer_auth" = [])),
    params(DemandListQuery),
    responses(
        (status = 200, description = "Page of feed posts", body = Vec<PostResponse>),
        (status = 403, description = "Not the store owner"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn reel_posts(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<DemandListQuery>,
) -> AppResult<ApiResponse<Paginated<PostResponse>>> {
    require_access(&current_user, STORE_ROLES)?;
    let posts = state.demand_service.reel_posts(&current_user, query).await?;
    Ok(ApiResponse::new(posts, "Posts listed"))
}
