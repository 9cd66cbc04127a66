//! Map widget: loads the area layer, joins the wave overview onto it and
//! tracks the interactive state of the map.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──mount──▶ Loading ──ok──▶ Ready
//!                             │  ▲
//!                           error│ retry / reload
//!                             ▼  │
//!                            Failed
//! ```
//!
//! The widget does not draw anything itself. [`MapWidget::scene`] returns a
//! [`MapScene`] describing the polygons, markers and view for a renderer.
//! Background work (the area load and the hover timers) runs on the Tokio
//! runtime and is aborted when the widget is dropped.

pub mod hover;
pub mod scene;
pub mod view;

use std::fmt;
use std::sync::Arc;

use log::{debug, error, info};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{Feature, FeatureCollection, LonLat, WaveOverview};
use crate::services::areas::AreaSource;
use crate::services::error::ServiceResult;
use crate::services::join::join_overview;

pub use hover::{HoverDebouncer, HOVER_DEBOUNCE};
pub use scene::{
    BaseMap, MapScene, MarkerLayer, PolygonLayer, PolygonStyle, Tooltip, BASE_MAP, MARKER_ICON,
};
pub use view::{MapView, Viewport};

/// Initial center over the Indonesian archipelago.
pub const DEFAULT_CENTER: LonLat = LonLat::new(116.7717081, -1.1744305);
pub const DEFAULT_ZOOM: u8 = 5;
pub const MIN_ZOOM: u8 = 5;
pub const MAX_ZOOM: u8 = 10;

/// Called with the joined feature when the user clicks an area.
pub type ClickAreaCallback = Arc<dyn Fn(&Feature) + Send + Sync>;

/// Which part of the area layer the widget loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AreaScope {
    #[default]
    All,
    Region(String),
}

/// Inputs of the widget.
#[derive(Clone)]
pub struct MapProps {
    pub center: LonLat,
    pub zoom: u8,
    pub markers: Vec<LonLat>,
    pub wave_overview: Arc<WaveOverview>,
    pub scope: AreaScope,
    pub viewport: Viewport,
    pub on_click_area: Option<ClickAreaCallback>,
}

impl Default for MapProps {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            wave_overview: Arc::new(WaveOverview::new()),
            scope: AreaScope::All,
            viewport: Viewport::default(),
            on_click_area: None,
        }
    }
}

impl fmt::Debug for MapProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapProps")
            .field("center", &self.center)
            .field("zoom", &self.zoom)
            .field("markers", &self.markers)
            .field("wave_overview", &self.wave_overview)
            .field("scope", &self.scope)
            .field("viewport", &self.viewport)
            .field("on_click_area", &self.on_click_area.is_some())
            .finish()
    }
}

/// Load status of the area layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WidgetStatus {
    Uninitialized,
    Loading,
    Ready { areas: usize },
    Failed { message: String },
}

impl WidgetStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WidgetStatus::Ready { .. } | WidgetStatus::Failed { .. })
    }
}

/// Per-area data derived from the joined collection.
#[derive(Debug, Clone)]
struct AreaLayer {
    /// `None` when the feature has no string `WP_IMM`.
    label: Option<String>,
    anchor: Option<LonLat>,
}

struct WidgetInner {
    wave_overview: Arc<WaveOverview>,
    markers: Vec<LonLat>,
    viewport: Viewport,
    view: MapView,
    areas: Option<Arc<FeatureCollection>>,
    joined: Option<Arc<FeatureCollection>>,
    layers: Vec<AreaLayer>,
    selection: Option<LonLat>,
    open_tooltip: Option<usize>,
    load_generation: u64,
}

impl WidgetInner {
    fn clear_areas(&mut self) {
        self.areas = None;
        self.joined = None;
        self.layers.clear();
        self.selection = None;
        self.open_tooltip = None;
    }

    /// Recomputes the join and refits the view to the new collection.
    fn rejoin(&mut self) {
        let Some(areas) = self.areas.as_ref() else {
            return;
        };
        let joined = Arc::new(join_overview(areas, &self.wave_overview));
        self.layers = joined
            .features
            .iter()
            .map(|feature| AreaLayer {
                label: feature.label().map(str::to_string),
                anchor: feature.tooltip_anchor(),
            })
            .collect();
        if let Some(bounds) = joined.bounds() {
            self.view.fit_bounds(&bounds, self.viewport);
        }
        self.joined = Some(joined);
    }
}

struct Shared {
    inner: Mutex<WidgetInner>,
    status: watch::Sender<WidgetStatus>,
}

impl Shared {
    fn finish_load(&self, generation: u64, result: ServiceResult<FeatureCollection>) {
        let mut inner = self.inner.lock();
        if inner.load_generation != generation {
            debug!("Discarding stale area load (generation {})", generation);
            return;
        }

        let status = match result {
            Ok(collection) => {
                let count = collection.len();
                inner.areas = Some(Arc::new(collection));
                inner.rejoin();
                info!("Area layer ready with {} polygons", count);
                WidgetStatus::Ready { areas: count }
            }
            Err(e) => {
                error!("fetch geojson failed: {}", e);
                WidgetStatus::Failed {
                    message: e.to_string(),
                }
            }
        };
        // Published under the lock so `scene()` never pairs new areas with a stale status.
        self.status.send_replace(status);
    }
}

/// Headless map widget.
pub struct MapWidget {
    shared: Arc<Shared>,
    source: Arc<dyn AreaSource>,
    scope: AreaScope,
    on_click_area: Option<ClickAreaCallback>,
    load_task: Mutex<Option<JoinHandle<()>>>,
    hover: HoverDebouncer,
}

impl MapWidget {
    /// Creates the widget and starts loading the area layer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(props: MapProps, source: Arc<dyn AreaSource>) -> Self {
        let inner = WidgetInner {
            wave_overview: props.wave_overview,
            markers: props.markers,
            viewport: props.viewport,
            view: MapView::new(props.center, props.zoom, MIN_ZOOM, MAX_ZOOM),
            areas: None,
            joined: None,
            layers: Vec::new(),
            selection: None,
            open_tooltip: None,
            load_generation: 0,
        };
        let (status, _) = watch::channel(WidgetStatus::Uninitialized);

        let widget = Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                status,
            }),
            source,
            scope: props.scope,
            on_click_area: props.on_click_area,
            load_task: Mutex::new(None),
            hover: HoverDebouncer::default(),
        };
        widget.start_load();
        widget
    }

    fn start_load(&self) {
        let generation = {
            let mut inner = self.shared.inner.lock();
            inner.load_generation += 1;
            inner.clear_areas();
            self.shared.status.send_replace(WidgetStatus::Loading);
            inner.load_generation
        };

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        let scope = self.scope.clone();
        let task = tokio::spawn(async move {
            let result = match &scope {
                AreaScope::All => source.fetch_all().await,
                AreaScope::Region(code) => source.fetch_by_code(code).await,
            };
            shared.finish_load(generation, result);
        });

        if let Some(previous) = self.load_task.lock().replace(task) {
            previous.abort();
        }
    }

    /// Reloads the area layer from scratch. Clears the selection.
    pub fn reload(&self) {
        self.start_load();
    }

    /// Reloads only after a failed load. Returns whether a load was started.
    pub fn retry(&self) -> bool {
        if matches!(self.status(), WidgetStatus::Failed { .. }) {
            self.start_load();
            true
        } else {
            false
        }
    }

    pub fn status(&self) -> WidgetStatus {
        self.shared.status.borrow().clone()
    }

    /// Waits until the current load is ready or has failed.
    pub async fn loaded(&self) -> WidgetStatus {
        let mut rx = self.shared.status.subscribe();
        let status = match rx.wait_for(WidgetStatus::is_terminal).await {
            Ok(status) => status.clone(),
            Err(_) => self.status(),
        };
        status
    }

    /// Replaces the overview and recomputes the join.
    pub fn set_wave_overview(&self, overview: Arc<WaveOverview>) {
        let mut inner = self.shared.inner.lock();
        inner.wave_overview = overview;
        inner.rejoin();
    }

    pub fn set_markers(&self, markers: Vec<LonLat>) {
        self.shared.inner.lock().markers = markers;
    }

    /// Joined collection, once loaded.
    pub fn joined_areas(&self) -> Option<Arc<FeatureCollection>> {
        self.shared.inner.lock().joined.clone()
    }

    pub fn selection(&self) -> Option<LonLat> {
        self.shared.inner.lock().selection
    }

    pub fn view(&self) -> MapView {
        self.shared.inner.lock().view
    }

    /// Moves the view; zoom is clamped to the allowed range.
    pub fn set_view(&self, center: LonLat, zoom: u8) {
        self.shared.inner.lock().view.set_view(center, zoom);
    }

    /// Opens the tooltip of the area at `index`.
    pub fn pointer_over_area(&self, index: usize) {
        let mut inner = self.shared.inner.lock();
        if index < inner.layers.len() {
            inner.open_tooltip = Some(index);
        }
    }

    pub fn pointer_out_area(&self, index: usize) {
        let mut inner = self.shared.inner.lock();
        if inner.open_tooltip == Some(index) {
            inner.open_tooltip = None;
        }
    }

    /// Handles a click on the area at `index`: selects its tooltip anchor,
    /// closes its tooltip and notifies `on_click_area`.
    ///
    /// Returns the clicked feature, or `None` if there is no such area.
    pub fn click_area(&self, index: usize) -> Option<Feature> {
        let feature = {
            let mut inner = self.shared.inner.lock();
            let anchor = inner.layers.get(index)?.anchor;
            let feature = inner.joined.as_ref()?.features.get(index)?.clone();
            inner.selection = anchor;
            if inner.open_tooltip == Some(index) {
                inner.open_tooltip = None;
            }
            feature
        };

        // Called without the lock held so the callback may use the widget.
        if let Some(callback) = &self.on_click_area {
            callback(&feature);
        }
        Some(feature)
    }

    /// Selects the first area whose label equals `label` exactly.
    ///
    /// Returns the selected point. On no match the selection is left as it
    /// was and `None` is returned. Areas without a label never match.
    pub fn select_by_label(&self, label: &str) -> Option<LonLat> {
        let mut inner = self.shared.inner.lock();
        let anchor = inner
            .layers
            .iter()
            .find(|layer| layer.label.as_deref() == Some(label))
            .and_then(|layer| layer.anchor);

        match anchor {
            Some(point) => {
                inner.selection = Some(point);
                debug!("Selected area '{}' at {:?}", label, point);
            }
            None => debug!("No area labelled '{}'", label),
        }
        anchor
    }

    /// Pointer entered the map: enable scroll-zoom after the debounce delay.
    pub fn pointer_enter(&self) {
        self.hover.schedule(true);
    }

    /// Pointer left the map: disable scroll-zoom after the debounce delay.
    pub fn pointer_leave(&self) {
        self.hover.schedule(false);
    }

    pub fn scroll_zoom_enabled(&self) -> bool {
        self.hover.scroll_zoom_enabled()
    }

    /// Current render model.
    pub fn scene(&self) -> MapScene {
        let inner = self.shared.inner.lock();
        let polygons = match inner.joined.as_ref() {
            Some(joined) => joined
                .features
                .iter()
                .zip(inner.layers.iter())
                .enumerate()
                .map(|(index, (feature, layer))| PolygonLayer {
                    feature: feature.clone(),
                    style: PolygonStyle::for_category(feature.category_today()),
                    tooltip: Tooltip {
                        content: layer.label.clone().unwrap_or_default(),
                        anchor: layer.anchor,
                        opacity: scene::TOOLTIP_OPACITY,
                        open: inner.open_tooltip == Some(index),
                    },
                })
                .collect(),
            None => Vec::new(),
        };

        MapScene {
            base_map: &BASE_MAP,
            status: self.status(),
            view: inner.view,
            scroll_zoom: self.hover.scroll_zoom_enabled(),
            polygons,
            selected_marker: inner.selection.map(MarkerLayer::selected),
            markers: inner.markers.iter().copied().map(MarkerLayer::extra).collect(),
        }
    }
}

impl Drop for MapWidget {
    fn drop(&mut self) {
        if let Some(task) = self.load_task.lock().take() {
            task.abort();
        }
    }
}
