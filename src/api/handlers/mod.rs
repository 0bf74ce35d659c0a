//! HTTP request handlers.

pub mod address_handler;
pub mod auth_handler;
pub mod demand_handler;
pub mod product_handler;
pub mod store_handler;
pub mod user_handler;

pub use address_handler::address_routes;
pub use auth_handler::auth_routes;
pub use demand_handler::{demand_routes, reel_routes};
pub use product_handler::product_routes;
pub use store_handler::store_routes;
pub use user_handler::{user_public_routes, user_routes};
