//! Data models for the application

mod image;

pub use image::{HttpHistory, ImageMetadata, NewHttpHistory, NewImageMetadata};
