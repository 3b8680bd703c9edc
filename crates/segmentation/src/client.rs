use tracing::debug;

use crate::protocol::{SegmentRequest, SegmentResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    Http(String),
    Status { status: u16, url: String },
    Decode { url: String, message: String },
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentError::Http(msg) => write!(f, "segmentation request failed: {msg}"),
            SegmentError::Status { status, url } => {
                write!(f, "segmentation service returned {status} for {url}")
            }
            SegmentError::Decode { url, message } => {
                write!(f, "segmentation response for {url} did not parse: {message}")
            }
        }
    }
}

impl std::error::Error for SegmentError {}

/// Anything that can answer a point prompt with mask polygons.
#[allow(async_fn_in_trait)]
pub trait SegmentPredictor {
    async fn predict(&self, request: &SegmentRequest) -> Result<SegmentResponse, SegmentError>;
}

/// HTTP client for the segmentation service.
#[derive(Debug, Clone)]
pub struct HttpSegmentClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSegmentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn segment_url(&self) -> String {
        format!("{}/segment", self.base_url)
    }
}

impl SegmentPredictor for HttpSegmentClient {
    async fn predict(&self, request: &SegmentRequest) -> Result<SegmentResponse, SegmentError> {
        let url = self.segment_url();
        debug!("segmentation POST {url}");
        let resp = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SegmentError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SegmentError::Status { status: status.as_u16(), url });
        }
        resp.json::<SegmentResponse>()
            .await
            .map_err(|e| SegmentError::Decode { url, message: e.to_string() })
    }
}
