use foundation::{GeoBounds, LngLat};

use crate::protocol::PixelPolygon;

/// Georeference of an image crop: pixel row 0 is the north edge, column 0
/// the west edge.
///
/// The mapping is linear in degrees across `bounds`, which holds up at the
/// small extents the crop flow produces. `bounds` must have extent on both
/// axes and the pixel grid must be non-empty.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageFrame {
    pub bounds: GeoBounds,
    pub width: u32,
    pub height: u32,
}

impl ImageFrame {
    pub fn new(bounds: GeoBounds, width: u32, height: u32) -> Self {
        Self { bounds, width, height }
    }

    pub fn pixel_to_geo(&self, pixel: [f64; 2]) -> LngLat {
        let fx = pixel[0] / f64::from(self.width);
        let fy = pixel[1] / f64::from(self.height);
        LngLat::new(
            self.bounds.west + fx * self.bounds.width(),
            self.bounds.north - fy * self.bounds.height(),
        )
    }

    pub fn geo_to_pixel(&self, pos: LngLat) -> [f64; 2] {
        [
            (pos.lng - self.bounds.west) / self.bounds.width() * f64::from(self.width),
            (self.bounds.north - pos.lat) / self.bounds.height() * f64::from(self.height),
        ]
    }

    /// Pixel-space polygons into geographic rings.
    pub fn georeference(&self, polygons: &[PixelPolygon]) -> Vec<Vec<Vec<LngLat>>> {
        polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .map(|ring| ring.iter().map(|&p| self.pixel_to_geo(p)).collect())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ImageFrame;
    use foundation::{GeoBounds, LngLat};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn frame() -> ImageFrame {
        ImageFrame::new(GeoBounds::new(146.80, -42.20, 146.90, -42.10), 800, 600)
    }

    #[test]
    fn pixel_corners_map_to_bounds_corners() {
        let f = frame();
        let nw = f.pixel_to_geo([0.0, 0.0]);
        assert_close(nw.lng, 146.80, 1e-12);
        assert_close(nw.lat, -42.10, 1e-12);
        let se = f.pixel_to_geo([800.0, 600.0]);
        assert_close(se.lng, 146.90, 1e-12);
        assert_close(se.lat, -42.20, 1e-12);
    }

    #[test]
    fn geo_to_pixel_inverts_pixel_to_geo() {
        let f = frame();
        for pixel in [[0.0, 0.0], [400.0, 300.0], [123.0, 456.0]] {
            let back = f.geo_to_pixel(f.pixel_to_geo(pixel));
            assert_close(back[0], pixel[0], 1e-9);
            assert_close(back[1], pixel[1], 1e-9);
        }
    }

    #[test]
    fn center_pixel_is_bounds_center() {
        let f = frame();
        let center = f.geo_to_pixel(LngLat::new(146.85, -42.15));
        assert_close(center[0], 400.0, 1e-9);
        assert_close(center[1], 300.0, 1e-9);
    }

    #[test]
    fn georeference_preserves_polygon_shape() {
        let f = frame();
        let polygons = vec![vec![vec![[0.0, 0.0], [800.0, 0.0], [800.0, 600.0], [0.0, 0.0]]]];
        let geo = f.georeference(&polygons);
        assert_eq!(geo.len(), 1);
        assert_eq!(geo[0].len(), 1);
        assert_eq!(geo[0][0].len(), 4);
        assert_close(geo[0][0][0].lng, 146.80, 1e-12);
        assert_close(geo[0][0][2].lat, -42.20, 1e-12);
    }
}
