//! # Snapcart Common Library
//!
//! Shared code for the snapcart services:
//! - Error and result types
//! - Configuration file discovery, root folder resolution, TOML write-back
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
