use catalog::{Collection, Item};
use foundation::GeoBounds;
use layers::{LayerDescriptor, LayerKind, Rgba};
use persist::StateStore;
use tiles::{RescaleRange, TileQuery, TileService};

use crate::session::{ExplorerSession, MIN_TILE_ZOOM, SessionError};

/// Registry id of the collection outlines.
pub const COLLECTION_OUTLINES_LAYER: &str = "collections";
/// Registry id of the item footprint outlines.
pub const ITEM_OUTLINES_LAYER: &str = "items";

const OUTLINE_WIDTH_PX: f32 = 2.0;
const COLLECTION_OUTLINE_COLOR: Rgba = [255, 0, 0, 255];
const ITEM_OUTLINE_COLOR: Rgba = [0, 0, 255, 255];

/// Source bands rendered to RGB for multispectral assets, 1-based.
const MS_BAND_ORDER: [u8; 3] = [4, 2, 1];

impl<S: StateStore> ExplorerSession<S> {
    /// Outlines every collection that has a spatial extent.
    pub fn show_collection_outlines(&mut self, collections: &[Collection]) {
        let rings = collections
            .iter()
            .filter_map(Collection::bounds)
            .map(|bounds| bounds.ring().to_vec())
            .collect();
        self.layers.upsert(LayerDescriptor::new(
            COLLECTION_OUTLINES_LAYER,
            LayerKind::PolygonOutline {
                rings,
                color: COLLECTION_OUTLINE_COLOR,
                width_px: OUTLINE_WIDTH_PX,
            },
        ));
    }

    /// Outlines the footprints of one collection's items.
    pub fn show_item_outlines(&mut self, items: &[Item]) {
        let rings = items
            .iter()
            .filter_map(|item| item.geometry.exterior_ring())
            .collect();
        self.layers.upsert(LayerDescriptor::new(
            ITEM_OUTLINES_LAYER,
            LayerKind::PolygonOutline {
                rings,
                color: ITEM_OUTLINE_COLOR,
                width_px: OUTLINE_WIDTH_PX,
            },
        ));
    }

    /// Fits the camera to everything the catalog covers. Returns `false`
    /// when no collection has a spatial extent.
    pub fn fit_all_collections(
        &mut self,
        collections: &[Collection],
    ) -> Result<bool, SessionError> {
        let combined = GeoBounds::union_all(collections.iter().filter_map(Collection::bounds));
        let Some(bounds) = combined else {
            return Ok(false);
        };
        self.fit_bounds(bounds)?;
        Ok(true)
    }

    /// Fits the camera to one collection's extent, if it has one.
    pub fn focus_collection(&mut self, collection: &Collection) -> Result<bool, SessionError> {
        let Some(bounds) = collection.bounds() else {
            return Ok(false);
        };
        self.fit_bounds(bounds)?;
        Ok(true)
    }

    /// Fits the camera to `item` and registers its imagery as a tile layer.
    pub fn focus_item(&mut self, item: &Item) -> Result<(), SessionError> {
        self.fit_bounds(item.bounds())?;
        self.layers.upsert(item_layer(&self.tiles, item));
        Ok(())
    }
}

fn item_layer(tiles: &TileService, item: &Item) -> LayerDescriptor {
    let asset = &item.assets.main;
    let template = if asset.is_multispectral() {
        // is_multispectral guarantees at least four bands.
        let query = MS_BAND_ORDER.iter().fold(TileQuery::default(), |query, &band| {
            let stats = &asset.bands[usize::from(band) - 1].statistics;
            query.with_band(band, RescaleRange::from_stats(stats.mean, stats.stddev))
        });
        tiles.tile_template(&asset.href, &query)
    } else {
        tiles.rgb_tile_template(&asset.href)
    };
    LayerDescriptor::new(
        item.id.clone(),
        LayerKind::TiledRaster {
            template,
            extent: Some(item.bounds()),
            min_tile_zoom: Some(MIN_TILE_ZOOM),
            nearest_sampling: true,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::{COLLECTION_OUTLINES_LAYER, ITEM_OUTLINES_LAYER};
    use crate::session::ExplorerSession;
    use catalog::{Collection, Item};
    use layers::LayerKind;
    use persist::MemoryStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tiles::{RescaleRange, TileQuery, TileService};
    use view::CanvasSize;

    const COG_HREF: &str = "https://data.test/site-a/ortho.tif";

    fn tiles() -> TileService {
        TileService::new("http://localhost:8000")
    }

    fn session(store: &mut MemoryStore) -> ExplorerSession<&mut MemoryStore> {
        let mut session = ExplorerSession::new(store, tiles());
        session.set_canvas_size(CanvasSize::new(800, 600));
        session
    }

    fn collection(id: &str, bbox: Option<[f64; 4]>) -> Collection {
        let boxes: Vec<_> = bbox.into_iter().collect();
        serde_json::from_value(json!({
            "type": "Collection",
            "stac_version": "1.1.0",
            "id": id,
            "extent": {
                "spatial": { "bbox": boxes },
                "temporal": { "interval": [[null, null]] }
            }
        }))
        .unwrap()
    }

    fn item(id: &str, band_count: usize) -> Item {
        let bands: Vec<_> = (1..=band_count)
            .map(|i| {
                json!({
                    "name": format!("b{i}"),
                    "eo:common_name": "band",
                    "statistics": {
                        "minimum": 0.0,
                        "maximum": 255.0,
                        "mean": 100.0 + i as f64,
                        "stddev": 10.0
                    }
                })
            })
            .collect();
        serde_json::from_value(json!({
            "type": "Feature",
            "stac_version": "1.1.0",
            "id": id,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [146.8, -42.2], [146.9, -42.2], [146.9, -42.1],
                    [146.8, -42.1], [146.8, -42.2]
                ]]
            },
            "bbox": [146.8, -42.2, 146.9, -42.1],
            "links": [],
            "assets": {
                "main": {
                    "href": COG_HREF,
                    "type": "image/tiff; application=geotiff; profile=cloud-optimized",
                    "roles": ["data"],
                    "bands": bands,
                    "nodata": 255.0
                }
            },
            "properties": {
                "datetime": "2026-01-10T00:00:00Z",
                "title": "Ortho A"
            }
        }))
        .unwrap()
    }

    #[test]
    fn collection_outlines_skip_boundless_collections() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let collections =
            vec![collection("a", Some([140.0, -44.0, 148.0, -40.0])), collection("b", None)];
        session.show_collection_outlines(&collections);

        let snapshot = session.layers().snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, COLLECTION_OUTLINES_LAYER);
        match &snapshot[0].kind {
            LayerKind::PolygonOutline { rings, color, width_px } => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(*color, [255, 0, 0, 255]);
                assert_eq!(*width_px, 2.0);
            }
            other => panic!("expected outlines, got {other:?}"),
        }
    }

    #[test]
    fn item_outlines_follow_footprints() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        session.show_item_outlines(&[item("item-1", 3)]);

        let snapshot = session.layers().snapshot();
        assert_eq!(snapshot[0].id, ITEM_OUTLINES_LAYER);
        match &snapshot[0].kind {
            LayerKind::PolygonOutline { rings, color, .. } => {
                assert_eq!(rings.len(), 1);
                assert_eq!(rings[0].len(), 5);
                assert_eq!(*color, [0, 0, 255, 255]);
            }
            other => panic!("expected outlines, got {other:?}"),
        }
    }

    #[test]
    fn fit_all_collections_unions_every_extent() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let collections = vec![
            collection("a", Some([0.0, 0.0, 10.0, 10.0])),
            collection("b", Some([20.0, 20.0, 30.0, 30.0])),
        ];
        assert!(session.fit_all_collections(&collections).unwrap());
        assert!((session.view_state().longitude - 15.0).abs() <= 1e-9);

        assert!(!session.fit_all_collections(&[collection("c", None)]).unwrap());
    }

    #[test]
    fn focus_collection_without_extent_is_a_no_op() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let before = session.view_state();
        assert!(!session.focus_collection(&collection("c", None)).unwrap());
        assert_eq!(session.view_state(), before);
        assert!(session.focus_collection(&collection("a", Some([0.0, 0.0, 10.0, 10.0]))).unwrap());
    }

    #[test]
    fn focus_item_registers_a_plain_rgb_layer() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let item = item("item-1", 3);
        session.focus_item(&item).unwrap();

        let snapshot = session.layers().snapshot();
        assert_eq!(snapshot[0].id, "item-1");
        match &snapshot[0].kind {
            LayerKind::TiledRaster { template, extent, min_tile_zoom, nearest_sampling } => {
                assert_eq!(*template, tiles().rgb_tile_template(COG_HREF));
                assert_eq!(*extent, Some(item.bounds()));
                assert_eq!(*min_tile_zoom, Some(18));
                assert!(*nearest_sampling);
            }
            other => panic!("expected a tiled raster, got {other:?}"),
        }
    }

    #[test]
    fn focus_item_rescales_multispectral_bands() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let item = item("item-ms", 5);
        session.focus_item(&item).unwrap();

        // Band order 4, 2, 1 with mean +/- 2 stddev per band.
        let expected_query = TileQuery::default()
            .with_band(4, RescaleRange::from_stats(104.0, 10.0))
            .with_band(2, RescaleRange::from_stats(102.0, 10.0))
            .with_band(1, RescaleRange::from_stats(101.0, 10.0));
        let expected = tiles().tile_template(COG_HREF, &expected_query);

        let snapshot = session.layers().snapshot();
        match &snapshot[0].kind {
            LayerKind::TiledRaster { template, .. } => {
                assert_eq!(*template, expected);
                assert!(template.contains("bidx=4&bidx=2&bidx=1"));
                assert!(template.contains("rescale=84%2C124"));
            }
            other => panic!("expected a tiled raster, got {other:?}"),
        }
    }

    #[test]
    fn focus_item_fits_the_camera() {
        let mut store = MemoryStore::new();
        let mut session = session(&mut store);
        let item = item("item-1", 3);
        session.focus_item(&item).unwrap();
        assert!((session.view_state().longitude - 146.85).abs() <= 1e-9);
    }
}
