use foundation::{GeoBounds, LngLat, ScreenPoint};

use crate::state::{CanvasSize, MAX_ZOOM, ViewState, ViewStatePatch};
use crate::viewport::Viewport;

/// Session-owned camera store.
///
/// Collaborating features read snapshots with [`get`](Self::get) and submit
/// partial updates; the store lives for the whole session and is only ever
/// reset, never replaced.
#[derive(Debug, Clone, Default)]
pub struct ViewportModel {
    state: ViewState,
    canvas: CanvasSize,
}

impl ViewportModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a previously persisted camera.
    pub fn with_state(state: ViewState) -> Self {
        let mut model = Self { state, canvas: CanvasSize::default() };
        model.state.max_zoom = MAX_ZOOM;
        model
    }

    pub fn get(&self) -> ViewState {
        self.state
    }

    /// Merges `patch` into the camera. `max_zoom` is pinned back to the
    /// policy ceiling afterwards, so no patch can raise it. The zoom value
    /// itself is not clamped here; zoom limits are enforced by the renderer.
    pub fn update(&mut self, patch: ViewStatePatch) {
        let mut next = patch.apply(self.state);
        next.max_zoom = MAX_ZOOM;
        self.state = next;
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas = size;
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    /// Moves the camera so `bounds` fills the canvas.
    ///
    /// Before the canvas has been measured (or when it is zero-sized) the
    /// transform is undefined, so only the center moves and the zoom keeps
    /// its current value.
    pub fn fit_bounds(&mut self, bounds: GeoBounds) {
        if self.canvas.is_empty() {
            self.update(ViewStatePatch::center(bounds.center()));
            return;
        }
        let fitted = Viewport::fit_bounds(bounds, self.canvas);
        match fitted.zoom {
            Some(zoom) => self.update(ViewStatePatch::center_zoom(fitted.center, zoom)),
            None => self.update(ViewStatePatch::center(fitted.center)),
        }
    }

    /// Current canvas transform; `None` until the canvas has a size.
    pub fn viewport(&self) -> Option<Viewport> {
        if self.canvas.is_empty() {
            return None;
        }
        Some(Viewport::new(self.state.center(), self.state.zoom, self.canvas))
    }

    pub fn project(&self, pos: LngLat) -> Option<ScreenPoint> {
        self.viewport().map(|vp| vp.project(pos))
    }

    pub fn unproject(&self, point: ScreenPoint) -> Option<LngLat> {
        self.viewport().map(|vp| vp.unproject(point))
    }

    /// Back to the default camera; the canvas size survives.
    pub fn reset(&mut self) {
        self.state = ViewState::default();
    }
}
