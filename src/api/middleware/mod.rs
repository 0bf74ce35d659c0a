//! API middleware.

mod auth;

pub use auth::{auth_middleware, require_access, require_admin, ADMIN_ONLY, STORE_ROLES};
