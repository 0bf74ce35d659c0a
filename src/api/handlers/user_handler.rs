//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{ImageUpload, ImageUploadForm, ValidatedJson};
use crate::api::middleware::require_admin;
use crate::api::AppState;
use crate::domain::{CreateUser, CurrentUser, SignUp, UpdateProfile, UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Signed link to the caller's profile picture
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfilePictureResponse {
    /// Empty when no picture was uploaded
    #[schema(example = "https://storage.googleapis.com/user-profiles-images/images/1700000000_a.png?X-Goog-Signature=...")]
    pub url: String,
}

/// Routes that need a token
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/me", get(get_current_user))
        .route("/profile", put(update_profile))
        .route(
            "/profile-picture",
            post(upload_profile_picture).get(get_profile_picture),
        )
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Public registration
pub fn user_public_routes() -> Router<AppState> {
    Router::new().route("/sign-up", post(sign_up))
}

/// Create a user (admin only)
#[utoipa::path(
    post,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or email already registered"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<Created<UserResponse>> {
    require_admin(&current_user)?;
    let user = state.user_service.create(payload).await?;
    Ok(Created::new(UserResponse::from(user), "User created"))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/user/sign-up",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error, admin access or email already registered")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUp>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.sign_up(payload).await?;
    Ok(Created::new(UserResponse::from(user), "User signed up"))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/user/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(current_user.id).await?;
    Ok(ApiResponse::new(UserResponse::from(user), "User found"))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<ApiResponse<Paginated<UserResponse>>> {
    require_admin(&current_user)?;
    let users = state.user_service.list(params).await?;
    Ok(ApiResponse::new(users.map(UserResponse::from), "Users listed"))
}

/// Get user by ID (own profile or admin)
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<UserResponse>> {
    if current_user.id != id {
        require_admin(&current_user)?;
    }
    let user = state.user_service.get(id).await?;
    Ok(ApiResponse::new(UserResponse::from(user), "User found"))
}

/// Update any user (admin only)
#[utoipa::path(
    put,
    path = "/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<ApiResponse<UserResponse>> {
    require_admin(&current_user)?;
    let user = state.user_service.update(id, payload).await?;
    Ok(ApiResponse::new(UserResponse::from(user), "User updated"))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Wrong current password or validation error")
    )
)]
pub async fn update_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfile>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .user_service
        .update_profile(&current_user, payload)
        .await?;
    Ok(ApiResponse::new(UserResponse::from(user), "Profile updated"))
}

/// Soft delete a user (admin only, cannot delete self)
#[utoipa::path(
    delete,
    path = "/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete your own account"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    require_admin(&current_user)?;

    if current_user.id == id {
        return Err(AppError::validation("Cannot delete your own account"));
    }

    state.user_service.delete(id).await?;
    Ok(ApiResponse::message("User deleted"))
}

/// Upload or replace the caller's profile picture
#[utoipa::path(
    post,
    path = "/user/profile-picture",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body(
        content = ImageUploadForm,
        content_type = "multipart/form-data",
        description = "Image file (jpg, jpeg, png, webp)"
    ),
    responses(
        (status = 201, description = "Picture stored", body = UserResponse),
        (status = 400, description = "Missing file or unsupported extension"),
        (status = 417, description = "Object storage failure")
    )
)]
pub async fn upload_profile_picture(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    upload: ImageUpload,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .user_service
        .upload_profile_picture(&current_user, upload.file_name, upload.bytes)
        .await?;
    Ok(Created::new(UserResponse::from(user), "Profile picture uploaded"))
}

/// Signed URL of the caller's profile picture
#[utoipa::path(
    get,
    path = "/user/profile-picture",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Signed URL, empty without a picture", body = ProfilePictureResponse)
    )
)]
pub async fn get_profile_picture(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfilePictureResponse>> {
    let url = state.user_service.profile_picture_url(&current_user).await?;
    Ok(ApiResponse::new(
        ProfilePictureResponse { url },
        "Profile picture found",
    ))
}
