use foundation::{GeoBounds, LngLat};
use serde::{Deserialize, Serialize};

/// RGBA color, 0-255 per channel.
pub type Rgba = [u8; 4];

/// What a layer draws.
///
/// Closed set: renderers match exhaustively, and a new kind is a source
/// change here rather than a stringly-typed extension point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    /// XYZ-tiled imagery; `template` keeps `{z}/{x}/{y}` placeholders for
    /// the renderer's tile fetcher.
    TiledRaster {
        template: String,
        extent: Option<GeoBounds>,
        min_tile_zoom: Option<u8>,
        nearest_sampling: bool,
    },
    /// Stroked rings, one per footprint.
    PolygonOutline {
        rings: Vec<Vec<LngLat>>,
        color: Rgba,
        width_px: f32,
    },
    /// Fixed-radius circles.
    PointMarker {
        points: Vec<LngLat>,
        color: Rgba,
        radius_px: f32,
    },
    /// Filled polygons, outer ring plus holes per polygon.
    GeoPolygons {
        polygons: Vec<Vec<Vec<LngLat>>>,
        fill: Rgba,
        stroke: Rgba,
        stroke_width_px: f32,
    },
}

/// Renderer-facing layer description.
///
/// Identity is `id`: two descriptors with the same id are the same layer at
/// different moments, and the registry keeps at most one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub id: String,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl LayerDescriptor {
    pub fn new(id: impl Into<String>, kind: LayerKind) -> Self {
        Self { id: id.into(), kind }
    }
}
