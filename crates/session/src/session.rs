use foundation::GeoBounds;
use layers::{LayerDescriptor, LayerKind, SharedLayerRegistry};
use persist::{StateStore, StoreError, load_json, save_json};
use tiles::TileService;
use tracing::{debug, warn};
use url::Url;
use view::{CanvasSize, ViewState, ViewStatePatch, Viewport, ViewportModel};

use crate::imagery::{ImageryRecord, ImagerySet};
use crate::notices::{Notice, NoticeLog};

/// Store key holding the persisted camera.
pub const VIEW_STATE_KEY: &str = "map-view-state";
/// Store key holding the persisted imagery records.
pub const IMAGERY_KEY: &str = "data-layers";

/// Tiles below this zoom are not requested for survey imagery.
pub(crate) const MIN_TILE_ZOOM: u8 = 18;

#[derive(Debug)]
pub enum SessionError {
    /// Imagery input that does not parse as an absolute URL.
    InvalidImageryUrl(String),
    /// The backing store failed.
    Store(StoreError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidImageryUrl(input) => {
                write!(f, "not a valid imagery URL: {input}")
            }
            SessionError::Store(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(err) => Some(err),
            SessionError::InvalidImageryUrl(_) => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}

/// In-flight imagery load, begun before the source's bounds are known.
///
/// The token pins the imagery epoch at `begin_imagery_load` time. Any later
/// `remove_imagery` or `clear_imagery` advances the epoch, so a slow bounds
/// response cannot resurrect imagery the user has already discarded.
#[derive(Debug, Clone)]
pub struct ImageryLoad {
    url: String,
    epoch: u64,
}

impl ImageryLoad {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// One user session: camera, layer registry, imagery records, notices, and
/// the store persisting them.
///
/// Each session owns its collaborators outright, so two sessions never
/// observe each other's state.
pub struct ExplorerSession<S: StateStore> {
    pub(crate) viewport: ViewportModel,
    pub(crate) layers: SharedLayerRegistry,
    pub(crate) imagery: ImagerySet,
    pub(crate) notices: NoticeLog,
    pub(crate) tiles: TileService,
    store: S,
    imagery_epoch: u64,
}

impl<S: StateStore> ExplorerSession<S> {
    /// Restores a session from `store`. An entry that cannot be read is
    /// discarded with a warning notice and replaced by defaults; layers for
    /// restored imagery records are registered immediately.
    pub fn new(store: S, tiles: TileService) -> Self {
        let mut notices = NoticeLog::new();
        let state = match load_json::<ViewState, _>(&store, VIEW_STATE_KEY) {
            Ok(Some(state)) => state,
            Ok(None) => ViewState::default(),
            Err(err) => {
                warn!("discarding saved view state: {err}");
                notices.warn(format!(
                    "Saved view state could not be read ({err}); using the default view."
                ));
                ViewState::default()
            }
        };
        let imagery = match load_json::<ImagerySet, _>(&store, IMAGERY_KEY) {
            Ok(Some(set)) => set,
            Ok(None) => ImagerySet::new(),
            Err(err) => {
                warn!("discarding saved imagery records: {err}");
                notices.warn(format!(
                    "Saved imagery could not be read ({err}); starting without overlays."
                ));
                ImagerySet::new()
            }
        };

        let registry = SharedLayerRegistry::new();
        for record in imagery.records() {
            registry.upsert(imagery_layer(&tiles, record));
        }

        Self {
            viewport: ViewportModel::with_state(state),
            layers: registry,
            imagery,
            notices,
            tiles,
            store,
            imagery_epoch: 0,
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.viewport.get()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.viewport.canvas_size()
    }

    /// Snapshot of the camera over the current canvas, if measured.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.viewport()
    }

    pub fn layers(&self) -> &SharedLayerRegistry {
        &self.layers
    }

    pub fn imagery(&self) -> &[ImageryRecord] {
        self.imagery.records()
    }

    pub fn tiles(&self) -> &TileService {
        &self.tiles
    }

    pub fn notices(&self) -> &[Notice] {
        self.notices.notices()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Applies a camera patch and persists the result.
    pub fn update_view(&mut self, patch: ViewStatePatch) -> Result<(), SessionError> {
        self.viewport.update(patch);
        self.persist_view()
    }

    /// Canvas size is per-mount state and is not persisted.
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.viewport.set_canvas_size(size);
    }

    /// Fits the camera to `bounds` and persists the result.
    pub fn fit_bounds(&mut self, bounds: GeoBounds) -> Result<(), SessionError> {
        self.viewport.fit_bounds(bounds);
        self.persist_view()
    }

    /// Validates `url` and records it with bounds that are already known.
    pub fn load_imagery(&mut self, url: &str, bounds: GeoBounds) -> Result<bool, SessionError> {
        let load = self.begin_imagery_load(url)?;
        self.finish_imagery_load(load, bounds)
    }

    /// Starts an imagery load: validates the URL and returns a token to
    /// redeem once the source's bounds have been fetched.
    pub fn begin_imagery_load(&mut self, url: &str) -> Result<ImageryLoad, SessionError> {
        if Url::parse(url).is_err() {
            warn!("rejected imagery URL {url:?}");
            self.notices.warn(format!("{url:?} is not a valid imagery URL."));
            return Err(SessionError::InvalidImageryUrl(url.to_string()));
        }
        Ok(ImageryLoad { url: url.to_string(), epoch: self.imagery_epoch })
    }

    /// Redeems an imagery load. Returns `true` if a record was added; a
    /// stale token or an already-known id leaves the session unchanged.
    pub fn finish_imagery_load(
        &mut self,
        load: ImageryLoad,
        bounds: GeoBounds,
    ) -> Result<bool, SessionError> {
        if load.epoch != self.imagery_epoch {
            debug!("dropping stale imagery load for {}", load.url);
            return Ok(false);
        }
        let record = ImageryRecord::rgb_cog(load.url, bounds);
        if !self.imagery.add(record.clone()) {
            return Ok(false);
        }
        self.layers.upsert(imagery_layer(&self.tiles, &record));
        self.persist_imagery()?;
        Ok(true)
    }

    /// Removes a record and its layer. Returns `true` if the set changed.
    /// Every removal invalidates in-flight loads; a record that lost its
    /// race can simply be loaded again.
    pub fn remove_imagery(&mut self, id: &str) -> Result<bool, SessionError> {
        self.imagery_epoch += 1;
        if !self.imagery.remove(id) {
            return Ok(false);
        }
        self.layers.remove(id);
        self.persist_imagery()?;
        Ok(true)
    }

    /// Removes every imagery record and layer, invalidating in-flight loads.
    pub fn clear_imagery(&mut self) -> Result<(), SessionError> {
        self.imagery_epoch += 1;
        if self.imagery.is_empty() {
            return Ok(());
        }
        for record in self.imagery.records() {
            self.layers.remove(record.id());
        }
        self.imagery.clear();
        self.persist_imagery()
    }

    /// Moves the camera to an imagery record's bounds. Returns `false` for
    /// an unknown id.
    pub fn fit_imagery(&mut self, id: &str) -> Result<bool, SessionError> {
        let Some(bounds) = self.imagery.get(id).map(ImageryRecord::bounds) else {
            return Ok(false);
        };
        self.fit_bounds(bounds)?;
        Ok(true)
    }

    pub(crate) fn persist_view(&mut self) -> Result<(), SessionError> {
        save_json(&mut self.store, VIEW_STATE_KEY, &self.viewport.get())?;
        Ok(())
    }

    fn persist_imagery(&mut self) -> Result<(), SessionError> {
        save_json(&mut self.store, IMAGERY_KEY, &self.imagery)?;
        Ok(())
    }
}

fn imagery_layer(tiles: &TileService, record: &ImageryRecord) -> LayerDescriptor {
    LayerDescriptor::new(
        record.id(),
        LayerKind::TiledRaster {
            template: tiles.rgb_tile_template(record.source_url()),
            extent: Some(record.bounds()),
            min_tile_zoom: Some(MIN_TILE_ZOOM),
            nearest_sampling: true,
        },
    )
}
