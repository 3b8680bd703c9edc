use foundation::LngLat;
use serde::{Deserialize, Serialize};

/// Ceiling the camera store pins `max_zoom` to on every update.
pub const MAX_ZOOM: f64 = 24.0;
/// Floor for `min_zoom`.
pub const MIN_ZOOM: f64 = 0.0;

/// Default camera over the primary survey area.
pub const DEFAULT_LONGITUDE: f64 = 146.72470583325884;
pub const DEFAULT_LATITUDE: f64 = -42.182031003074464;
pub const DEFAULT_ZOOM: f64 = 7.5;

/// Complete camera description, the shape persisted between sessions.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            longitude: DEFAULT_LONGITUDE,
            latitude: DEFAULT_LATITUDE,
            zoom: DEFAULT_ZOOM,
            pitch: 0.0,
            bearing: 0.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl ViewState {
    pub fn center(&self) -> LngLat {
        LngLat::new(self.longitude, self.latitude)
    }
}

/// Partial camera update; unset fields keep their current value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStatePatch {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub zoom: Option<f64>,
    pub pitch: Option<f64>,
    pub bearing: Option<f64>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl ViewStatePatch {
    pub fn center(pos: LngLat) -> Self {
        Self {
            longitude: Some(pos.lng),
            latitude: Some(pos.lat),
            ..Self::default()
        }
    }

    pub fn center_zoom(pos: LngLat, zoom: f64) -> Self {
        Self {
            longitude: Some(pos.lng),
            latitude: Some(pos.lat),
            zoom: Some(zoom),
            ..Self::default()
        }
    }

    pub fn zoom(zoom: f64) -> Self {
        Self { zoom: Some(zoom), ..Self::default() }
    }

    /// Shallow merge over `state`.
    pub fn apply(self, state: ViewState) -> ViewState {
        ViewState {
            longitude: self.longitude.unwrap_or(state.longitude),
            latitude: self.latitude.unwrap_or(state.latitude),
            zoom: self.zoom.unwrap_or(state.zoom),
            pitch: self.pitch.unwrap_or(state.pitch),
            bearing: self.bearing.unwrap_or(state.bearing),
            min_zoom: self.min_zoom.unwrap_or(state.min_zoom),
            max_zoom: self.max_zoom.unwrap_or(state.max_zoom),
        }
    }
}

/// Canvas extent in CSS pixels. `0 x 0` is the unmeasured pre-mount state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasSize, MAX_ZOOM, ViewState, ViewStatePatch};
    use foundation::LngLat;

    #[test]
    fn patch_merges_only_set_fields() {
        let state = ViewState::default();
        let next = ViewStatePatch::zoom(9.25).apply(state);
        assert_eq!(next.zoom, 9.25);
        assert_eq!(next.longitude, state.longitude);
        assert_eq!(next.latitude, state.latitude);
        assert_eq!(next.pitch, state.pitch);
        assert_eq!(next.bearing, state.bearing);
    }

    #[test]
    fn empty_patch_is_identity() {
        let state = ViewState::default();
        assert_eq!(ViewStatePatch::default().apply(state), state);
    }

    #[test]
    fn center_patch_sets_both_axes() {
        let next = ViewStatePatch::center(LngLat::new(10.0, 20.0)).apply(ViewState::default());
        assert_eq!(next.longitude, 10.0);
        assert_eq!(next.latitude, 20.0);
    }

    #[test]
    fn default_state_carries_zoom_policy() {
        let state = ViewState::default();
        assert_eq!(state.max_zoom, MAX_ZOOM);
        assert_eq!(state.zoom, 7.5);
    }

    #[test]
    fn partial_patch_deserializes() {
        let patch: ViewStatePatch = serde_json::from_str(r#"{"zoom": 11.0}"#).unwrap();
        assert_eq!(patch.zoom, Some(11.0));
        assert_eq!(patch.longitude, None);
    }

    #[test]
    fn view_state_round_trips_through_json() {
        let state = ViewState::default();
        let json = serde_json::to_string(&state).unwrap();
        let back: ViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn canvas_size_emptiness() {
        assert!(CanvasSize::default().is_empty());
        assert!(CanvasSize::new(0, 600).is_empty());
        assert!(CanvasSize::new(800, 0).is_empty());
        assert!(!CanvasSize::new(800, 600).is_empty());
    }
}
