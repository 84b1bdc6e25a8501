//! Pollinations AI image generation provider.
//!
//! One GET per image; the prompt travels in the path and everything else
//! as query parameters. The response body is the image itself.

use crate::error::{GenPixError, Result};
use crate::image::provider::ImageProvider;
use crate::image::types::{
    GeneratedImage, GenerationMetadata, ImageFormat, ImageProviderKind, ImageRequest,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use std::time::{Duration, Instant};

const DEFAULT_BASE_URL: &str = "https://image.pollinations.ai/prompt";
const DEFAULT_MODEL: &str = "flux";

/// Builder for PollinationsProvider.
#[derive(Debug, Clone)]
pub struct PollinationsProviderBuilder {
    base_url: String,
    model: String,
    nologo: bool,
    private: bool,
    enhance: bool,
    timeout: Duration,
    client: Option<reqwest::Client>,
}

impl Default for PollinationsProviderBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            nologo: true,
            private: true,
            enhance: true,
            timeout: Duration::from_secs(120),
            client: None,
        }
    }
}

impl PollinationsProviderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoint the encoded prompt is appended to.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Hide the Pollinations watermark.
    pub fn nologo(mut self, nologo: bool) -> Self {
        self.nologo = nologo;
        self
    }

    /// Keep generated images out of the public feed.
    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Let the service rewrite the prompt before generating.
    pub fn enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    /// Per-request timeout. Ignored when a custom client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<PollinationsProvider> {
        let base_url = Url::parse(&self.base_url).map_err(|e| {
            GenPixError::InvalidInput(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GenPixError::InvalidInput(format!(
                "base URL '{}' cannot carry a path",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(GenPixError::InvalidInput("model must not be empty".into()));
        }

        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder().timeout(self.timeout).build()?,
        };

        Ok(PollinationsProvider {
            client,
            base_url,
            model: self.model,
            nologo: self.nologo,
            private: self.private,
            enhance: self.enhance,
        })
    }
}

/// Pollinations image generation provider.
pub struct PollinationsProvider {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    nologo: bool,
    private: bool,
    enhance: bool,
}

impl PollinationsProvider {
    pub fn builder() -> PollinationsProviderBuilder {
        PollinationsProviderBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Builds the request URL: `{base}/{encoded prompt}?width=..&height=..&...`.
    pub fn request_url(&self, request: &ImageRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&request.prompt);
        }

        url.query_pairs_mut()
            .append_pair("width", &request.width.to_string())
            .append_pair("height", &request.height.to_string())
            .append_pair("model", &self.model)
            .append_pair("seed", &request.seed.to_string())
            .append_pair("nologo", bool_flag(self.nologo))
            .append_pair("private", bool_flag(self.private))
            .append_pair("enhance", bool_flag(self.enhance));

        url
    }
}

fn bool_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[async_trait]
impl ImageProvider for PollinationsProvider {
    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage> {
        let start = Instant::now();
        let url = self.request_url(request);
        tracing::debug!(%url, "requesting image");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "image/jpeg")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenPixError::Api {
                status: status.as_u16(),
                message: format!(
                    "{} - {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    text
                ),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let data = response.bytes().await?.to_vec();
        if data.is_empty() {
            return Err(GenPixError::Decode("empty image body".into()));
        }

        let format = ImageFormat::from_magic_bytes(&data)
            .or_else(|| content_type.as_deref().and_then(ImageFormat::from_mime_type))
            .unwrap_or_default();

        let duration_ms = start.elapsed().as_millis() as u64;

        Ok(GeneratedImage::new(
            data,
            format,
            ImageProviderKind::Pollinations,
            GenerationMetadata {
                model: Some(self.model.clone()),
                seed: Some(request.seed),
                width: Some(request.width),
                height: Some(request.height),
                duration_ms: Some(duration_ms),
            },
        ))
    }

    fn kind(&self) -> ImageProviderKind {
        ImageProviderKind::Pollinations
    }
}
