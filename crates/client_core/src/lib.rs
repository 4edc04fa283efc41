use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{SegmentEnvelope, SegmentRequest, SegmentationResult};
use tracing::{info, warn};

pub mod config;
pub mod controller;
pub mod error;
pub mod view;

pub use controller::{RequestController, RequestState, RequestTicket, SubmitOutcome};
pub use error::{ErrorCategory, RequestError};

const SEGMENT_PATH: &str = "/api/segment";

/// Anything that can turn an image name into a segmentation result.
#[async_trait]
pub trait SegmentationBackend: Send + Sync {
    async fn segment(&self, image_name: &str) -> Result<SegmentationResult, RequestError>;
}

/// Resolves service-relative asset paths for display.
pub trait UrlResolver {
    fn resolve_url(&self, path: &str) -> String;
}

/// HTTP client for the remote segmentation service.
#[derive(Debug, Clone)]
pub struct SegmentationClient {
    http: Client,
    base_url: String,
}

impl SegmentationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches an already resolved asset, e.g. the segmented image.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, RequestError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Server {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl UrlResolver for SegmentationClient {
    fn resolve_url(&self, path: &str) -> String {
        resolve_against(&self.base_url, path)
    }
}

pub fn resolve_against(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base_url = base_url.trim_end_matches('/');
    if path.is_empty() || path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

#[async_trait]
impl SegmentationBackend for SegmentationClient {
    async fn segment(&self, image_name: &str) -> Result<SegmentationResult, RequestError> {
        let url = format!("{}{SEGMENT_PATH}", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&SegmentRequest {
                image_name: image_name.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                image_name,
                status = status.as_u16(),
                "segmentation: service returned non-success status"
            );
            return Err(RequestError::Server {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: SegmentEnvelope = serde_json::from_slice(&body)?;
        if !envelope.success {
            warn!(image_name, "segmentation: service reported success=false");
            return Err(RequestError::Server {
                status: status.as_u16(),
            });
        }

        let result: SegmentationResult = serde_json::from_slice(&body)?;
        info!(
            image_name,
            nuclei_count = result.nuclei_count,
            "segmentation: response decoded"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
