//! Service collaborators outside the inference pipeline

pub mod store_links;

pub use store_links::{default_stores, StoreLink, StoreLinks, StoreTemplate};
