use foundation::GeoBounds;
use serde::Deserialize;
use tracing::debug;
use url::form_urlencoded;

use crate::rescale::RescaleRange;

/// XYZ route serving retina tiles (256 logical pixels at @2x).
const XYZ_ROUTE: &str = "/cog/tiles/WebMercatorQuad/{z}/{x}/{y}@2x";

/// Byte value masking missing data in RGB orthomosaics.
const RGB_NODATA: f64 = 255.0;

/// Rendering parameters carried in a tile or crop URL's query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileQuery {
    /// 1-based source band indexes, in output channel order.
    pub bidx: Vec<u8>,
    /// One range per entry of `bidx`.
    pub rescale: Vec<RescaleRange>,
    pub nodata: Option<f64>,
}

impl TileQuery {
    /// Plain RGB rendering.
    pub fn rgb() -> Self {
        Self { nodata: Some(RGB_NODATA), ..Self::default() }
    }

    pub fn with_band(mut self, index: u8, rescale: RescaleRange) -> Self {
        self.bidx.push(index);
        self.rescale.push(rescale);
        self
    }

    fn append_to(&self, params: &mut form_urlencoded::Serializer<'_, String>) {
        if let Some(nodata) = self.nodata {
            params.append_pair("nodata", &nodata.to_string());
        }
        for index in &self.bidx {
            params.append_pair("bidx", &index.to_string());
        }
        for range in &self.rescale {
            params.append_pair("rescale", &range.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileServiceError {
    Http(String),
    Status { status: u16, url: String },
    Decode { url: String, message: String },
}

impl std::fmt::Display for TileServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileServiceError::Http(msg) => write!(f, "tile service request failed: {msg}"),
            TileServiceError::Status { status, url } => {
                write!(f, "tile service returned {status} for {url}")
            }
            TileServiceError::Decode { url, message } => {
                write!(f, "tile service response for {url} did not parse: {message}")
            }
        }
    }
}

impl std::error::Error for TileServiceError {}

/// URL construction and metadata fetches against the dynamic tile service.
///
/// Templates keep `{z}/{x}/{y}` literal; the renderer's tile fetcher fills
/// them in. The source image URL always travels percent-encoded in the
/// query string.
#[derive(Debug, Clone)]
pub struct TileService {
    base_url: String,
    http: reqwest::Client,
}

impl TileService {
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

    /// XYZ template for a plain RGB asset.
    pub fn rgb_tile_template(&self, source_url: &str) -> String {
        self.tile_template(source_url, &TileQuery::rgb())
    }

    /// XYZ template with explicit rendering parameters.
    pub fn tile_template(&self, source_url: &str, query: &TileQuery) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("url", source_url);
        query.append_to(&mut params);
        format!("{}{XYZ_ROUTE}?{}", self.base_url, params.finish())
    }

    /// PNG crop of `bounds` at `width` x `height` pixels.
    pub fn crop_url(&self, source_url: &str, bounds: GeoBounds, width: u32, height: u32) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("url", source_url);
        format!(
            "{}/cog/bbox/{},{},{},{}/{}x{}.png?{}",
            self.base_url,
            bounds.west,
            bounds.south,
            bounds.east,
            bounds.north,
            width,
            height,
            params.finish()
        )
    }

    /// WGS84 footprint of a source image.
    pub async fn cog_bounds(&self, source_url: &str) -> Result<GeoBounds, TileServiceError> {
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("url", source_url);
        let url = format!("{}/cog/bounds?{}", self.base_url, params.finish());
        debug!("tile service GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TileServiceError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TileServiceError::Status { status: status.as_u16(), url });
        }
        let body: BoundsResponse = resp
            .json()
            .await
            .map_err(|e| TileServiceError::Decode { url, message: e.to_string() })?;
        Ok(body.bounds)
    }
}

#[derive(Debug, Deserialize)]
struct BoundsResponse {
    bounds: GeoBounds,
}
