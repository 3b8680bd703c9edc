use catalog::Item;
use foundation::{LngLat, ScreenPoint, point_in_ring};
use layers::{LayerDescriptor, LayerHandle, LayerKind, Rgba, SharedLayerRegistry};
use segmentation::{ImageFrame, SegmentError, SegmentPredictor, SegmentRequest, SegmentResponse};
use tiles::TileService;
use tracing::debug;
use view::Viewport;

/// Registry id of the pickable item footprint.
pub const CLICKABLE_AREA_LAYER: &str = "clickable-area";
/// Registry id of the pending prompt marker.
pub const PREDICT_POINT_LAYER: &str = "predict-point";
/// Registry id of the accumulated segment polygons.
pub const SEGMENTS_LAYER: &str = "segments";
/// Registry id of the per-segment prompt markers.
pub const SEGMENT_POINTS_LAYER: &str = "segment-points";

// The footprint is fill-only so it can take clicks without drawing.
const FOOTPRINT_FILL: Rgba = [255, 0, 0, 0];
const PROMPT_COLOR: Rgba = [255, 0, 0, 255];
const PROMPT_RADIUS_PX: f32 = 6.0;
const SEGMENT_FILL: Rgba = [255, 0, 0, 128];
const SEGMENT_STROKE: Rgba = [255, 0, 0, 255];
const SEGMENT_STROKE_WIDTH_PX: f32 = 2.0;
const SEGMENT_POINT_COLOR: Rgba = [0, 0, 0, 255];
const SEGMENT_POINT_RADIUS_PX: f32 = 5.0;

/// One accepted prediction: its polygons and the prompt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub polygons: Vec<Vec<Vec<LngLat>>>,
    pub prompt: LngLat,
}

/// Point-prompted labelling over one catalog item.
///
/// The workflow owns its layers through scoped handles, so every exit path
/// removes them. Its layer set: the pickable footprint, the pending prompt
/// marker, and the accumulated segments with their prompt points.
pub struct LabelingWorkflow {
    registry: SharedLayerRegistry,
    source_url: String,
    footprint: Vec<LngLat>,
    prompt: Option<LngLat>,
    segments: Vec<Segment>,
    _footprint_layer: LayerHandle,
    prompt_handle: Option<LayerHandle>,
    segments_handle: Option<LayerHandle>,
    points_handle: Option<LayerHandle>,
}

impl LabelingWorkflow {
    /// Starts labelling `item`, registering its pickable footprint.
    pub fn new(registry: SharedLayerRegistry, item: &Item) -> Self {
        let footprint = item.geometry.exterior_ring().unwrap_or_default();
        let footprint_layer = registry.upsert_scoped(LayerDescriptor::new(
            CLICKABLE_AREA_LAYER,
            LayerKind::GeoPolygons {
                polygons: vec![item.geometry.rings()],
                fill: FOOTPRINT_FILL,
                stroke: FOOTPRINT_FILL,
                stroke_width_px: 0.0,
            },
        ));
        Self {
            registry,
            source_url: item.assets.main.href.clone(),
            footprint,
            prompt: None,
            segments: Vec::new(),
            _footprint_layer: footprint_layer,
            prompt_handle: None,
            segments_handle: None,
            points_handle: None,
        }
    }

    pub fn prompt(&self) -> Option<LngLat> {
        self.prompt
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Records a prompt from a canvas click. Returns `false` when the click
    /// lands outside the item footprint, which leaves the prompt as-is.
    pub fn set_prompt(&mut self, click: ScreenPoint, viewport: &Viewport) -> bool {
        let pos = viewport.unproject(click);
        if !point_in_ring(&self.footprint, pos) {
            debug!("prompt at ({}, {}) is outside the item footprint", pos.lng, pos.lat);
            return false;
        }
        self.prompt = Some(pos);
        let marker = prompt_marker(pos);
        match &self.prompt_handle {
            Some(handle) => {
                handle.refresh(marker);
            }
            None => self.prompt_handle = Some(self.registry.upsert_scoped(marker)),
        }
        true
    }

    /// Drops the prompt and its marker layer.
    pub fn clear_prompt(&mut self) {
        self.prompt = None;
        self.prompt_handle = None;
    }

    /// Builds the predict request for the current prompt: the visible canvas
    /// as a crop of the source imagery, with the prompt mapped to a pixel in
    /// that crop. `None` without a prompt.
    pub fn crop_request(
        &self,
        viewport: &Viewport,
        tiles: &TileService,
    ) -> Option<(SegmentRequest, ImageFrame)> {
        let prompt = self.prompt?;
        let bounds = viewport.visible_bounds();
        let size = viewport.size();
        let frame = ImageFrame::new(bounds, size.width, size.height);
        let request = SegmentRequest::foreground(
            tiles.crop_url(&self.source_url, bounds, size.width, size.height),
            frame.geo_to_pixel(prompt),
        );
        Some((request, frame))
    }

    /// Accepts a prediction: georeferences its polygons through `frame`,
    /// keeps the segment, and refreshes the segment layers. The prompt is
    /// consumed either way. Returns `false` when nothing was added, either
    /// because the prediction was empty or because the prompt was already
    /// gone by the time the response arrived.
    pub fn apply_prediction(&mut self, frame: &ImageFrame, response: &SegmentResponse) -> bool {
        let Some(prompt) = self.prompt.take() else {
            debug!("dropping prediction with no pending prompt");
            return false;
        };
        self.prompt_handle = None;
        if response.is_empty() {
            debug!("prediction returned no regions");
            return false;
        }
        self.segments.push(Segment { polygons: frame.georeference(&response.polygons), prompt });
        self.refresh_segment_layers();
        true
    }

    /// One predict round trip: request from the current prompt, await the
    /// predictor, apply the result.
    pub async fn predict_with<P: SegmentPredictor>(
        &mut self,
        predictor: &P,
        viewport: &Viewport,
        tiles: &TileService,
    ) -> Result<bool, SegmentError> {
        let Some((request, frame)) = self.crop_request(viewport, tiles) else {
            return Ok(false);
        };
        let response = predictor.predict(&request).await?;
        Ok(self.apply_prediction(&frame, &response))
    }

    fn refresh_segment_layers(&mut self) {
        let polygons =
            self.segments.iter().flat_map(|segment| segment.polygons.iter().cloned()).collect();
        let segments_layer = LayerDescriptor::new(
            SEGMENTS_LAYER,
            LayerKind::GeoPolygons {
                polygons,
                fill: SEGMENT_FILL,
                stroke: SEGMENT_STROKE,
                stroke_width_px: SEGMENT_STROKE_WIDTH_PX,
            },
        );
        let points_layer = LayerDescriptor::new(
            SEGMENT_POINTS_LAYER,
            LayerKind::PointMarker {
                points: self.segments.iter().map(|segment| segment.prompt).collect(),
                color: SEGMENT_POINT_COLOR,
                radius_px: SEGMENT_POINT_RADIUS_PX,
            },
        );
        match &self.segments_handle {
            Some(handle) => {
                handle.refresh(segments_layer);
            }
            None => self.segments_handle = Some(self.registry.upsert_scoped(segments_layer)),
        }
        match &self.points_handle {
            Some(handle) => {
                handle.refresh(points_layer);
            }
            None => self.points_handle = Some(self.registry.upsert_scoped(points_layer)),
        }
    }
}

fn prompt_marker(pos: LngLat) -> LayerDescriptor {
    LayerDescriptor::new(
        PREDICT_POINT_LAYER,
        LayerKind::PointMarker {
            points: vec![pos],
            color: PROMPT_COLOR,
            radius_px: PROMPT_RADIUS_PX,
        },
    )
}
