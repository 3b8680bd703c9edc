use foundation::{GeoBounds, LngLat, ScreenPoint, lng_lat_to_world, scale, world_to_lng_lat};

use crate::state::CanvasSize;

/// Pure Web-Mercator canvas transform for a fixed camera.
///
/// Pitch and bearing are carried in the camera state for the renderer; the
/// 2D screen mapping here ignores them, as does the fit computation.
#[derive(Debug, Copy, Clone)]
pub struct Viewport {
    center: LngLat,
    zoom: f64,
    size: CanvasSize,
}

/// Camera produced by fitting a box to a canvas. `zoom` is `None` when the
/// box had no extent on either axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FittedView {
    pub center: LngLat,
    pub zoom: Option<f64>,
}

impl Viewport {
    /// `size` must be non-empty; callers guard with [`CanvasSize::is_empty`].
    pub fn new(center: LngLat, zoom: f64, size: CanvasSize) -> Self {
        Self { center, zoom, size }
    }

    pub fn center(&self) -> LngLat {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn project(&self, pos: LngLat) -> ScreenPoint {
        let s = scale(self.zoom);
        let w = lng_lat_to_world(pos);
        let c = lng_lat_to_world(self.center);
        ScreenPoint::new(
            (w[0] - c[0]) * s + f64::from(self.size.width) / 2.0,
            (w[1] - c[1]) * s + f64::from(self.size.height) / 2.0,
        )
    }

    pub fn unproject(&self, point: ScreenPoint) -> LngLat {
        let s = scale(self.zoom);
        let c = lng_lat_to_world(self.center);
        world_to_lng_lat([
            c[0] + (point.x - f64::from(self.size.width) / 2.0) / s,
            c[1] + (point.y - f64::from(self.size.height) / 2.0) / s,
        ])
    }

    /// Geographic box covering the whole canvas.
    pub fn visible_bounds(&self) -> GeoBounds {
        let top_left = self.unproject(ScreenPoint::new(0.0, 0.0));
        let bottom_right = self.unproject(ScreenPoint::new(
            f64::from(self.size.width),
            f64::from(self.size.height),
        ));
        GeoBounds::from_corners(top_left, bottom_right)
    }

    /// Tightest camera for which `bounds` projects inside `size`.
    ///
    /// The zoom is the smaller of the two axis-constrained fits; the center
    /// is the Mercator midpoint of the projected box, so the fitted box sits
    /// symmetric on the canvas. Axes without extent place no constraint.
    pub fn fit_bounds(bounds: GeoBounds, size: CanvasSize) -> FittedView {
        let top_left = lng_lat_to_world(LngLat::new(bounds.west, bounds.north));
        let bottom_right = lng_lat_to_world(LngLat::new(bounds.east, bounds.south));
        let span_x = bottom_right[0] - top_left[0];
        let span_y = bottom_right[1] - top_left[1];

        let zoom_x = (span_x > 0.0).then(|| (f64::from(size.width) / span_x).log2());
        let zoom_y = (span_y > 0.0).then(|| (f64::from(size.height) / span_y).log2());
        let zoom = match (zoom_x, zoom_y) {
            (Some(x), Some(y)) => Some(x.min(y)),
            (Some(x), None) => Some(x),
            (None, Some(y)) => Some(y),
            (None, None) => None,
        };

        let center = world_to_lng_lat([
            (top_left[0] + bottom_right[0]) / 2.0,
            (top_left[1] + bottom_right[1]) / 2.0,
        ]);
        FittedView { center, zoom }
    }
}
