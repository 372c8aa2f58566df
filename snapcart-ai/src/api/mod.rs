//! HTTP API handlers for snapcart-ai

pub mod health;
pub mod infer;
pub mod products;

pub use health::health_routes;
pub use infer::infer_routes;
pub use products::product_routes;
