//! Utility modules for snapcart-ai

pub mod image_decoder;

pub use image_decoder::{decode_image, decode_image_blocking, DecodedImage};
