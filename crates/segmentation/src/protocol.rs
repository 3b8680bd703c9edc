use serde::{Deserialize, Serialize};

/// Prompt label marking a point as part of the object.
pub const FOREGROUND: u8 = 1;
/// Prompt label marking a point as outside the object.
pub const BACKGROUND: u8 = 0;

/// Ring of image pixel coordinates.
pub type PixelRing = Vec<[f64; 2]>;
/// Polygon as rings; the first ring is the exterior.
pub type PixelPolygon = Vec<PixelRing>;

/// Point-prompted segmentation request.
///
/// `points[i]` pairs with `labels[i]`; the service rejects mismatched
/// lengths. Points are pixel coordinates into the image at `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRequest {
    pub url: String,
    pub points: Vec<[f64; 2]>,
    pub labels: Vec<u8>,
}

impl SegmentRequest {
    /// Single foreground prompt.
    pub fn foreground(url: impl Into<String>, point: [f64; 2]) -> Self {
        Self {
            url: url.into(),
            points: vec![point],
            labels: vec![FOREGROUND],
        }
    }
}

/// Masks polygonized in image pixel space.
///
/// Empty means the model found nothing at the prompt; a valid outcome, not
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentResponse {
    pub polygons: Vec<PixelPolygon>,
}

impl SegmentResponse {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{FOREGROUND, SegmentRequest, SegmentResponse};

    #[test]
    fn foreground_request_serializes_like_the_wire_format() {
        let req = SegmentRequest::foreground("https://crops.test/a.png", [412.0, 233.5]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "url": "https://crops.test/a.png",
                "points": [[412.0, 233.5]],
                "labels": [FOREGROUND]
            })
        );
    }

    #[test]
    fn empty_response_parses_and_reports_empty() {
        let resp: SegmentResponse = serde_json::from_str(r#"{"polygons": []}"#).unwrap();
        assert!(resp.is_empty());
    }

    #[test]
    fn single_ring_polygons_parse() {
        let resp: SegmentResponse = serde_json::from_str(
            r#"{"polygons": [[[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 0.0]]]]}"#,
        )
        .unwrap();
        assert_eq!(resp.polygons.len(), 1);
        assert_eq!(resp.polygons[0].len(), 1);
        assert_eq!(resp.polygons[0][0].len(), 4);
    }
}
