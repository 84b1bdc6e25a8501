#![warn(missing_docs)]
//! genpix - batch text-to-image generation.
//!
//! Turns one prompt into a gallery of images fetched from the Pollinations
//! image API, one request per image with a fixed delay between requests.
//!
//! # Quick Start
//!
//! ```no_run
//! use genpix::{GenerationRequest, Orchestrator, PollinationsProvider};
//!
//! #[tokio::main]
//! async fn main() -> genpix::Result<()> {
//!     let provider = PollinationsProvider::builder().build()?;
//!     let orchestrator = Orchestrator::builder(provider).output_dir("gallery").build();
//!
//!     let request = GenerationRequest::new("A dragon sleeping on gold coins", 2, "16/9".parse()?)?;
//!     let report = orchestrator.run(&request).await?;
//!     for slot in &report.slots {
//!         println!("#{}: {:?} {:?}", slot.index, slot.state, slot.result_url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `pollinations`: Pollinations AI provider
//! - `cli`: Command-line interface

mod error;

pub mod batch;
pub mod config;
pub mod image;
pub mod prompts;
pub mod theme;

// Re-export error types at crate root
pub use error::{GenPixError, Result};

pub use batch::{BatchReport, Gallery, ImageSlot, Orchestrator, SlotState, SlotUpdate};
pub use image::{
    image_dimensions, AspectRatio, Dimensions, GeneratedImage, GenerationMetadata,
    GenerationRequest, ImageFormat, ImageProvider, ImageProviderKind, ImageRequest,
    MAX_IMAGE_COUNT,
};
pub use theme::{ThemeController, ThemeMode};

#[cfg(feature = "pollinations")]
pub use image::providers::{PollinationsProvider, PollinationsProviderBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::batch::{Orchestrator, SlotState};
    pub use crate::error::{GenPixError, Result};
    pub use crate::image::{AspectRatio, GenerationRequest, ImageProvider};

    #[cfg(feature = "pollinations")]
    pub use crate::image::providers::PollinationsProvider;
}
