//! Typed subset of the imagery catalog's STAC responses.
//!
//! Only fields the explorer consumes are modelled; unknown JSON keys are
//! ignored on the way in.

use foundation::{GeoBounds, LngLat};
use serde::{Deserialize, Serialize};

/// Media type of a cloud-optimized GeoTIFF data asset.
pub const COG_MEDIA_TYPE: &str = "image/tiff; application=geotiff; profile=cloud-optimized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
    pub stddev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub name: String,
    #[serde(rename = "eo:common_name")]
    pub common_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub statistics: BandStatistics,
}

/// The COG asset an item renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub bands: Vec<Band>,
    pub nodata: f64,
}

impl ImageAsset {
    /// More than three bands means the asset is not plain RGB and needs a
    /// band selection plus per-band rescaling to display.
    pub fn is_multispectral(&self) -> bool {
        self.bands.len() > 3
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailAsset {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAssets {
    pub main: ImageAsset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<ThumbnailAsset>,
}

/// GeoJSON polygon footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub type_: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl PolygonGeometry {
    /// Outer ring as positions; `None` when the geometry has no rings.
    pub fn exterior_ring(&self) -> Option<Vec<LngLat>> {
        let ring = self.coordinates.first()?;
        Some(ring.iter().map(|&p| LngLat::from(p)).collect())
    }

    /// Every ring as positions, exterior first.
    pub fn rings(&self) -> Vec<Vec<LngLat>> {
        self.coordinates
            .iter()
            .map(|ring| ring.iter().map(|&p| LngLat::from(p)).collect())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemProperties {
    pub datetime: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub instruments: Vec<String>,
    #[serde(rename = "proj:code", default, skip_serializing_if = "Option::is_none")]
    pub proj_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    #[serde(default)]
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: PolygonGeometry,
    pub bbox: GeoBounds,
    pub links: Vec<Link>,
    pub assets: ItemAssets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    pub properties: ItemProperties,
}

impl Item {
    pub fn bounds(&self) -> GeoBounds {
        self.bbox
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<GeoBounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<String>; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub type_: String,
    pub stac_version: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    pub extent: Extent,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Collection {
    /// Overall footprint; the first bbox covers the whole collection.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.extent.spatial.bbox.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub links: Vec<Link>,
}

/// One page of `GET /collections/{id}/items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    #[serde(rename = "type")]
    pub type_: String,
    pub features: Vec<Item>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ItemPage {
    pub fn next_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == "next")
    }

    pub fn has_next(&self) -> bool {
        self.next_link().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{COG_MEDIA_TYPE, Collection, Item, ItemPage};
    use foundation::GeoBounds;
    use pretty_assertions::assert_eq;

    fn item_json() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "stac_version": "1.1.0",
            "stac_extensions": [],
            "id": "site-a-2025-11-03-rgb",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [146.80, -42.20], [146.83, -42.20],
                    [146.83, -42.18], [146.80, -42.18],
                    [146.80, -42.20]
                ]]
            },
            "bbox": [146.80, -42.20, 146.83, -42.18],
            "links": [],
            "assets": {
                "main": {
                    "href": "https://data.test/site-a/ortho.tif",
                    "type": COG_MEDIA_TYPE,
                    "title": "Orthomosaic",
                    "roles": ["data"],
                    "nodata": 255.0,
                    "bands": [
                        {"name": "b1", "eo:common_name": "red",
                         "statistics": {"minimum": 0.0, "maximum": 255.0, "mean": 101.0, "stddev": 40.0}},
                        {"name": "b2", "eo:common_name": "green",
                         "statistics": {"minimum": 0.0, "maximum": 255.0, "mean": 98.0, "stddev": 37.0}},
                        {"name": "b3", "eo:common_name": "blue",
                         "statistics": {"minimum": 0.0, "maximum": 255.0, "mean": 90.0, "stddev": 35.0}}
                    ]
                },
                "thumbnail": {
                    "href": "https://data.test/site-a/thumb.png",
                    "type": "image/png",
                    "roles": ["thumbnail"]
                }
            },
            "collection": "survey-rgb",
            "properties": {
                "datetime": "2025-11-03T00:12:00Z",
                "title": "Site A flight 1",
                "platform": "uav",
                "instruments": ["rgb-camera"],
                "proj:code": "EPSG:32755",
                "proj:wkt2": "ignored",
                "unknown:extra": 1
            }
        })
    }

    #[test]
    fn item_parses_and_exposes_bounds() {
        let item: Item = serde_json::from_value(item_json()).unwrap();
        assert_eq!(item.bounds(), GeoBounds::new(146.80, -42.20, 146.83, -42.18));
        assert_eq!(item.assets.main.media_type, COG_MEDIA_TYPE);
        assert!(!item.assets.main.is_multispectral());
        let ring = item.geometry.exterior_ring().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn four_or_more_bands_is_multispectral() {
        let mut json = item_json();
        let mut more = json["assets"]["main"]["bands"].as_array().unwrap().clone();
        more.push(serde_json::json!({
            "name": "b4", "eo:common_name": "nir",
            "statistics": {"minimum": 0.0, "maximum": 1.0, "mean": 0.4, "stddev": 0.1}
        }));
        json["assets"]["main"]["bands"] = serde_json::Value::Array(more);
        let item: Item = serde_json::from_value(json).unwrap();
        assert!(item.assets.main.is_multispectral());
    }

    #[test]
    fn collection_parses_and_exposes_bounds() {
        let json = serde_json::json!({
            "type": "Collection",
            "stac_version": "1.1.0",
            "id": "survey-rgb",
            "title": "RGB surveys",
            "license": "proprietary",
            "extent": {
                "spatial": {"bbox": [[140.0, -44.0, 148.0, -40.0]]},
                "temporal": {"interval": [["2025-01-01T00:00:00Z", null]]}
            },
            "links": []
        });
        let collection: Collection = serde_json::from_value(json).unwrap();
        assert_eq!(collection.bounds(), Some(GeoBounds::new(140.0, -44.0, 148.0, -40.0)));
        assert_eq!(collection.extent.temporal.interval[0][1], None);
    }

    #[test]
    fn empty_spatial_extent_has_no_bounds() {
        let json = serde_json::json!({
            "type": "Collection",
            "stac_version": "1.1.0",
            "id": "empty",
            "extent": {
                "spatial": {"bbox": []},
                "temporal": {"interval": []}
            }
        });
        let collection: Collection = serde_json::from_value(json).unwrap();
        assert_eq!(collection.bounds(), None);
    }

    #[test]
    fn item_page_pagination_links() {
        let page: ItemPage = serde_json::from_value(serde_json::json!({
            "type": "FeatureCollection",
            "features": [],
            "links": [
                {"href": "https://stac.test/collections/c/items?page=2", "rel": "next"},
                {"href": "https://stac.test/collections/c", "rel": "self"}
            ]
        }))
        .unwrap();
        assert!(page.has_next());
        assert_eq!(page.next_link().unwrap().href, "https://stac.test/collections/c/items?page=2");
    }
}
