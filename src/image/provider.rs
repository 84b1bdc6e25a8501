//! Image provider trait.

use crate::error::Result;
use crate::image::types::{GeneratedImage, ImageProviderKind, ImageRequest};
use async_trait::async_trait;

/// Trait for image generation providers.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Generates one image from the given request.
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage>;

    /// Returns the kind of this provider.
    fn kind(&self) -> ImageProviderKind;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str {
        match self.kind() {
            ImageProviderKind::Pollinations => "Pollinations AI",
        }
    }
}
