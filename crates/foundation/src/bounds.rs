use serde::{Deserialize, Serialize};

use crate::geo::LngLat;

/// Geographic bounding box in WGS84 degrees, serialized as
/// `[west, south, east, north]`.
///
/// Callers keep `west <= east` and `south <= north`; boxes spanning the
/// antimeridian are not modelled here.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Box spanned by two corners in either order.
    pub fn from_corners(a: LngLat, b: LngLat) -> Self {
        Self {
            west: a.lng.min(b.lng),
            south: a.lat.min(b.lat),
            east: a.lng.max(b.lng),
            north: a.lat.max(b.lat),
        }
    }

    pub fn center(&self) -> LngLat {
        LngLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn is_finite(&self) -> bool {
        self.west.is_finite()
            && self.south.is_finite()
            && self.east.is_finite()
            && self.north.is_finite()
    }

    pub fn contains(&self, point: LngLat) -> bool {
        point.lng >= self.west
            && point.lng <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }

    /// Smallest box covering both inputs.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Combined extent of `boxes`; `None` when the iterator is empty.
    pub fn union_all<I>(boxes: I) -> Option<GeoBounds>
    where
        I: IntoIterator<Item = GeoBounds>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Corner ring, counter-clockwise from the south-west corner; the first
    /// vertex is repeated to close the ring.
    pub fn ring(&self) -> [LngLat; 5] {
        [
            LngLat::new(self.west, self.south),
            LngLat::new(self.east, self.south),
            LngLat::new(self.east, self.north),
            LngLat::new(self.west, self.north),
            LngLat::new(self.west, self.south),
        ]
    }
}

impl From<[f64; 4]> for GeoBounds {
    fn from(v: [f64; 4]) -> Self {
        Self { west: v[0], south: v[1], east: v[2], north: v[3] }
    }
}

impl From<GeoBounds> for [f64; 4] {
    fn from(b: GeoBounds) -> Self {
        [b.west, b.south, b.east, b.north]
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, LngLat};

    #[test]
    fn union_is_commutative() {
        let a = GeoBounds::new(140.0, -44.0, 148.0, -40.0);
        let b = GeoBounds::new(145.0, -46.0, 150.0, -39.0);
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn union_with_self_is_identity() {
        let a = GeoBounds::new(140.0, -44.0, 148.0, -40.0);
        assert_eq!(a.union(&a), a);
    }

    #[test]
    fn union_covers_both_inputs() {
        let a = GeoBounds::new(140.0, -44.0, 148.0, -40.0);
        let b = GeoBounds::new(145.0, -46.0, 150.0, -39.0);
        let u = a.union(&b);
        assert_eq!(u, GeoBounds::new(140.0, -46.0, 150.0, -39.0));
        assert!(u.contains(a.center()));
        assert!(u.contains(b.center()));
    }

    #[test]
    fn union_all_of_nothing_is_none() {
        assert_eq!(GeoBounds::union_all(std::iter::empty()), None);
    }

    #[test]
    fn union_all_of_one_is_that_box() {
        let a = GeoBounds::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(GeoBounds::union_all([a]), Some(a));
    }

    #[test]
    fn union_all_folds_every_box() {
        let boxes = [
            GeoBounds::new(0.0, 0.0, 1.0, 1.0),
            GeoBounds::new(-5.0, 2.0, -4.0, 3.0),
            GeoBounds::new(2.0, -1.0, 3.0, 0.5),
        ];
        let u = GeoBounds::union_all(boxes).unwrap();
        assert_eq!(u, GeoBounds::new(-5.0, -1.0, 3.0, 3.0));
    }

    #[test]
    fn ring_is_closed_and_counter_clockwise() {
        let ring = GeoBounds::new(140.0, -44.0, 148.0, -40.0).ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
        // Shoelace sum is positive for counter-clockwise order in a
        // y-up coordinate frame.
        let area2: f64 = ring
            .windows(2)
            .map(|w| w[0].lng * w[1].lat - w[1].lng * w[0].lat)
            .sum();
        assert!(area2 > 0.0, "expected counter-clockwise ring, area2 = {area2}");
    }

    #[test]
    fn from_corners_accepts_any_order() {
        let a = LngLat::new(148.0, -40.0);
        let b = LngLat::new(140.0, -44.0);
        assert_eq!(
            GeoBounds::from_corners(a, b),
            GeoBounds::new(140.0, -44.0, 148.0, -40.0)
        );
    }

    #[test]
    fn serializes_as_four_array() {
        let b = GeoBounds::new(140.0, -44.0, 148.0, -40.0);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[140.0,-44.0,148.0,-40.0]");
        let back: GeoBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
