//! Router-level tests.
//!
//! Hand-written fake services stand in for the real ones so requests run
//! through the full router, auth middleware and error envelope without a
//! database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use marketplace_api::api::{create_router, AppState};
use marketplace_api::domain::{
    Address, AddressDraft, Coordinates, CreateAddress, CreateDemand, CreateProduct, CreateStore,
    CreateUser, CurrentUser, DemandResponse, Password, PostResponse, Product, ProductType, SignUp,
    Store, StoreDraft, UpdateAddress, UpdateDemand, UpdateProduct, UpdateProfile, UpdateStore,
    UpdateUser, User, UserAccess,
};
use marketplace_api::errors::{AppError, AppResult};
use marketplace_api::infra::Database;
use marketplace_api::services::{
    AddressService, AuthService, Claims, DemandListQuery, DemandService, ProductService,
    StoreService, TokenResponse, UserService,
};
use marketplace_api::types::{Paginated, PaginationParams};

const ADMIN_TOKEN: &str = "admin-token";
const OWNER_TOKEN: &str = "owner-token";
const GUEST_TOKEN: &str = "guest-token";

// =============================================================================
// Fake services
// =============================================================================

fn account(access: UserAccess) -> User {
    User::new(
        CreateUser {
            name: "Maria Souza".to_string(),
            email: "Maria@Example.com".to_string(),
            password: "SecurePass123!".to_string(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            access,
        },
        "hashed".to_string(),
    )
}

struct FakeAuth;

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        if email == "maria@example.com" && password == "SecurePass123!" {
            Ok(TokenResponse {
                access_token: ADMIN_TOKEN.to_string(),
                token_type: "bearer".to_string(),
                expires_in: 3600,
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    fn verify_token(&self, _token: &str) -> AppResult<Claims> {
        Err(AppError::Unauthorized)
    }

    async fn authenticate(&self, token: &str) -> AppResult<CurrentUser> {
        let access = match token {
            ADMIN_TOKEN => UserAccess::Admin,
            OWNER_TOKEN => UserAccess::StoreOwner,
            GUEST_TOKEN => UserAccess::Guest,
            _ => return Err(AppError::Unauthorized),
        };
        Ok(CurrentUser::from(&account(access)))
    }
}

struct FakeUsers;

#[async_trait]
impl UserService for FakeUsers {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        Ok(User::new(input, "hashed".to_string()))
    }

    async fn sign_up(&self, input: SignUp) -> AppResult<User> {
        if input.access.is_admin() {
            return Err(AppError::validation("Admin accounts cannot sign up"));
        }
        let hash = Password::new(&input.password)?.into_string();
        Ok(User::new(input, hash))
    }

    async fn get(&self, id: Uuid) -> AppResult<User> {
        if id.is_nil() {
            return Err(AppError::not_found("User"));
        }
        let mut user = account(UserAccess::StoreOwner);
        user.id = id;
        Ok(user)
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        Ok(Paginated::new(
            vec![account(UserAccess::Admin), account(UserAccess::Guest)],
            params,
            2,
        ))
    }

    async fn update(&self, _id: Uuid, _changes: UpdateUser) -> AppResult<User> {
        Err(AppError::internal("not exercised"))
    }

    async fn update_profile(
        &self,
        _requester: &CurrentUser,
        _changes: UpdateProfile,
    ) -> AppResult<User> {
        Err(AppError::InvalidCredentials)
    }

    async fn delete(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn upload_profile_picture(
        &self,
        _requester: &CurrentUser,
        _file_name: String,
        _bytes: Vec<u8>,
    ) -> AppResult<User> {
        Err(AppError::internal("not exercised"))
    }

    async fn profile_picture_url(&self, _requester: &CurrentUser) -> AppResult<String> {
        Ok(String::new())
    }
}

struct FakeAddresses;

#[async_trait]
impl AddressService for FakeAddresses {
    async fn create(&self, _input: CreateAddress) -> AppResult<Address> {
        Err(AppError::internal("not exercised"))
    }

    async fn get(&self, _id: Uuid) -> AppResult<Address> {
        Err(AppError::not_found("Address"))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Address>> {
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn update(
        &self,
        _requester: &CurrentUser,
        _id: Uuid,
        _changes: UpdateAddress,
    ) -> AppResult<Address> {
        Err(AppError::not_found("Address"))
    }

    async fn delete(&self, _requester: &CurrentUser, _id: Uuid) -> AppResult<()> {
        Err(AppError::forbidden("Address belongs to another user's store"))
    }

    async fn fresh_fill(&self, _zip_code: String) -> AppResult<AddressDraft> {
        Err(AppError::external("viacep unavailable"))
    }

    async fn coordinates(&self, _id: Uuid) -> AppResult<Coordinates> {
        Err(AppError::not_found("Address"))
    }
}

struct FakeStores;

#[async_trait]
impl StoreService for FakeStores {
    async fn create(&self, _requester: &CurrentUser, _input: CreateStore) -> AppResult<Store> {
        Err(AppError::conflict("Store"))
    }

    async fn get(&self, _id: Uuid) -> AppResult<Store> {
        Err(AppError::not_found("Store"))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Store>> {
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn list_mine(
        &self,
        _requester: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<Store>> {
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn update(
        &self,
        _requester: &CurrentUser,
        _id: Uuid,
        _changes: UpdateStore,
    ) -> AppResult<Store> {
        Err(AppError::forbidden("Not the store owner"))
    }

    async fn delete(&self, _requester: &CurrentUser, _id: Uuid) -> AppResult<()> {
        Err(AppError::forbidden("Not the store owner"))
    }

    async fn fresh_fill(&self, _cnpj: String) -> AppResult<StoreDraft> {
        Err(AppError::external("receitaws unavailable"))
    }

    async fn upload_image(
        &self,
        _requester: &CurrentUser,
        _id: Uuid,
        _file_name: String,
        _bytes: Vec<u8>,
    ) -> AppResult<Store> {
        Err(AppError::internal("not exercised"))
    }

    async fn delete_image(
        &self,
        _requester: &CurrentUser,
        _id: Uuid,
        _index: usize,
    ) -> AppResult<Store> {
        Err(AppError::internal("not exercised"))
    }
}

struct FakeProducts;

#[async_trait]
impl ProductService for FakeProducts {
    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        Product::new(input)
    }

    async fn get(&self, _id: Uuid) -> AppResult<Product> {
        Err(AppError::not_found("Product"))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Product>> {
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn search(
        &self,
        name: String,
        _product_type: Option<ProductType>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Search name cannot be empty"));
        }
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn update(&self, _id: Uuid, _changes: UpdateProduct) -> AppResult<Product> {
        Err(AppError::not_found("Product"))
    }

    async fn delete(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::not_found("Product"))
    }

    async fn upload_image(
        &self,
        _id: Uuid,
        _file_name: String,
        _bytes: Vec<u8>,
    ) -> AppResult<Product> {
        Err(AppError::internal("not exercised"))
    }

    async fn delete_image(&self, _id: Uuid, _index: usize) -> AppResult<Product> {
        Err(AppError::internal("not exercised"))
    }
}

struct FakeDemands;

#[async_trait]
impl DemandService for FakeDemands {
    async fn create(
        &self,
        _requester: &CurrentUser,
        _input: CreateDemand,
    ) -> AppResult<DemandResponse> {
        Err(AppError::not_found("Store"))
    }

    async fn get(&self, _requester: &CurrentUser, _id: Uuid) -> AppResult<DemandResponse> {
        Err(AppError::not_found("Demand"))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<DemandResponse>> {
        Ok(Paginated::new(Vec::new(), params, 0))
    }

    async fn update(
        &self,
        _requester: &CurrentUser,
        _id: Uuid,
        _changes: UpdateDemand,
    ) -> AppResult<DemandResponse> {
        Err(AppError::not_found("Demand"))
    }

    async fn delete(&self, _requester: &CurrentUser, _id: Uuid) -> AppResult<()> {
        Err(AppError::not_found("Demand"))
    }

    async fn list_by_store(
        &self,
        _requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<DemandResponse>> {
        Ok(Paginated::new(Vec::new(), query.pagination(), 0))
    }

    async fn reel_posts(
        &self,
        _requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<PostResponse>> {
        Ok(Paginated::new(Vec::new(), query.pagination(), 0))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    let state = AppState {
        auth_service: Arc::new(FakeAuth),
        user_service: Arc::new(FakeUsers),
        address_service: Arc::new(FakeAddresses),
        store_service: Arc::new(FakeStores),
        product_service: Arc::new(FakeProducts),
        demand_service: Arc::new(FakeDemands),
        database: Arc::new(Database::from_connection(DatabaseConnection::Disconnected)),
    };
    create_router(state)
}

async fn send(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response: Response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let (status, body) = send(Method::GET, "/user/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["payload"], Value::Null);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let (status, _) = send(Method::GET, "/store/mine", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let request = Request::builder()
        .uri("/user/me")
        .header(header::AUTHORIZATION, format!("Basic {}", ADMIN_TOKEN))
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_wraps_token_in_envelope() {
    let (status, body) = send(
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "maria@example.com", "password": "SecurePass123!"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["payload"]["access_token"], ADMIN_TOKEN);
    assert_eq!(body["payload"]["token_type"], "bearer");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (status, body) = send(
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "maria@example.com", "password": "nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn login_with_malformed_email_is_rejected() {
    let (status, body) = send(
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "not-an-email", "password": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("email"));
}

// =============================================================================
// Access levels
// =============================================================================

#[tokio::test]
async fn guest_cannot_reach_store_routes() {
    let (status, body) = send(Method::GET, "/store/mine", Some(GUEST_TOKEN), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn store_owner_cannot_list_every_demand() {
    let (status, _) = send(Method::GET, "/demand", Some(OWNER_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn store_owner_cannot_create_products() {
    let (status, _) = send(
        Method::POST,
        "/product",
        Some(OWNER_TOKEN),
        Some(json!({"name": "Arroz", "unit_type": "KILOGRAM", "product_type": "GRAIN"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn product_reads_are_open_to_any_account() {
    let (status, body) = send(Method::GET, "/product?page=2", Some(GUEST_TOKEN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["meta"]["page"], 2);
    assert_eq!(body["payload"]["data"], json!([]));
}

// =============================================================================
// Resources
// =============================================================================

#[tokio::test]
async fn sign_up_is_public_and_returns_201() {
    let (status, body) = send(
        Method::POST,
        "/user/sign-up",
        None,
        Some(json!({
            "name": "João",
            "email": "Joao@Example.com",
            "password": "SecurePass123!",
            "access": "STORE_OWNER"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["payload"]["email"], "joao@example.com");
    assert!(body["payload"].get("password_hash").is_none());
}

#[tokio::test]
async fn sign_up_as_admin_is_rejected() {
    let (status, body) = send(
        Method::POST,
        "/user/sign-up",
        None,
        Some(json!({
            "name": "Root",
            "email": "root@example.com",
            "password": "SecurePass123!",
            "access": "ADMIN"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn admin_creates_product_with_201() {
    let (status, body) = send(
        Method::POST,
        "/product",
        Some(ADMIN_TOKEN),
        Some(json!({"name": "  Arroz  ", "unit_type": "KILOGRAM", "product_type": "GRAIN"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product created");
    assert_eq!(body["payload"]["name"], "Arroz");
    assert_eq!(body["payload"]["product_type"], "GRAIN");
}

#[tokio::test]
async fn missing_demand_is_not_found() {
    let uri = format!("/demand/{}", Uuid::new_v4());
    let (status, body) = send(Method::GET, &uri, Some(OWNER_TOKEN), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Demand not found");
}

#[tokio::test]
async fn malformed_path_id_is_rejected() {
    let (status, _) = send(Method::GET, "/store/not-a-uuid", Some(OWNER_TOKEN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_product_search_is_rejected() {
    let (status, _) = send(
        Method::GET,
        "/product/search?name=%20%20",
        Some(GUEST_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn external_failure_maps_to_417() {
    let (status, body) = send(
        Method::GET,
        "/address/fresh-fill?cep=01001000",
        Some(OWNER_TOKEN),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::EXPECTATION_FAILED);
    assert_eq!(body["code"], "EXTERNAL_SERVICE_ERROR");
}

#[tokio::test]
async fn deleting_another_owners_address_is_forbidden() {
    let uri = format!("/address/{}", Uuid::new_v4());
    let (status, body) = send(Method::DELETE, &uri, Some(OWNER_TOKEN), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["payload"], Value::Null);
}

#[tokio::test]
async fn list_by_store_accepts_radius_filters() {
    let uri = format!(
        "/demand/list-by-store?store_id={}&radius_meters=2500&status=OPENED",
        Uuid::new_v4()
    );
    let (status, body) = send(Method::GET, &uri, Some(OWNER_TOKEN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Demands listed");
    assert_eq!(body["payload"]["meta"]["total"], 0);
}

#[tokio::test]
async fn delete_returns_null_payload() {
    let uri = format!("/user/{}", Uuid::new_v4());
    let (status, body) = send(Method::DELETE, &uri, Some(ADMIN_TOKEN), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], Value::Null);
    assert_eq!(body["message"], "User deleted");
}

#[tokio::test]
async fn profile_picture_is_empty_when_unset() {
    let (status, body) = send(
        Method::GET,
        "/user/profile-picture",
        Some(OWNER_TOKEN),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["url"], "");
}

// =============================================================================
// Infrastructure
// =============================================================================

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let (status, body) = send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(Method::GET, "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/demand/list-by-store").is_some());
}

#[test]
fn app_error_status_mapping() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::forbidden("no"), StatusCode::FORBIDDEN),
        (AppError::not_found("Store"), StatusCode::NOT_FOUND),
        (AppError::conflict("Store"), StatusCode::CONFLICT),
        (AppError::validation("bad"), StatusCode::BAD_REQUEST),
        (AppError::external("down"), StatusCode::EXPECTATION_FAILED),
        (AppError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (error, expected) in cases {
        assert_eq!(error.status(), expected, "{:?}", error);
    }
}
