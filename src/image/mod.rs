//! Image generation module.

pub mod dimensions;
mod provider;
pub mod providers;
mod types;

pub use dimensions::{image_dimensions, Dimensions, DEFAULT_BASE_SIZE};
pub use provider::ImageProvider;
pub use types::{
    AspectRatio, GeneratedImage, GenerationMetadata, GenerationRequest, ImageFormat,
    ImageProviderKind, ImageRequest, MAX_IMAGE_COUNT,
};
