//! Render model produced by the map widget.

use serde::Serialize;

use super::view::MapView;
use super::WidgetStatus;
use crate::models::{Feature, LonLat};
use crate::services::color::fill_color;

/// Stroke color of every area outline.
pub const STROKE_COLOR: &str = "#001B54";
pub const STROKE_WEIGHT: f64 = 0.5;
pub const FILL_OPACITY: f64 = 0.75;
pub const TOOLTIP_OPACITY: f64 = 0.8;
/// Z-offset applied to extra markers so they rise above the selection marker.
pub const MARKER_RISE_OFFSET: i32 = 10;

/// OpenStreetMap raster tiles under the area layer.
pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Base map and map chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseMap {
    pub tile_url: &'static str,
    /// The zoom buttons are hidden.
    pub zoom_control: bool,
}

pub static BASE_MAP: BaseMap = BaseMap {
    tile_url: TILE_URL_TEMPLATE,
    zoom_control: false,
};

/// Icon shared by every marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerIcon {
    pub icon_url: &'static str,
    pub icon_size: [u32; 2],
}

pub static MARKER_ICON: MarkerIcon = MarkerIcon {
    icon_url: "/icons/marker.png",
    icon_size: [38, 72],
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolygonStyle {
    pub color: &'static str,
    pub weight: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

impl PolygonStyle {
    pub fn for_category(category: &str) -> Self {
        Self {
            color: STROKE_COLOR,
            weight: STROKE_WEIGHT,
            fill_color: fill_color(category),
            fill_opacity: FILL_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub content: String,
    pub anchor: Option<LonLat>,
    pub opacity: f64,
    pub open: bool,
}

/// One rendered area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLayer {
    pub feature: Feature,
    pub style: PolygonStyle,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLayer {
    pub position: LonLat,
    pub icon: &'static MarkerIcon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rise_offset: Option<i32>,
}

impl MarkerLayer {
    pub fn selected(position: LonLat) -> Self {
        Self {
            position,
            icon: &MARKER_ICON,
            rise_offset: None,
        }
    }

    pub fn extra(position: LonLat) -> Self {
        Self {
            position,
            icon: &MARKER_ICON,
            rise_offset: Some(MARKER_RISE_OFFSET),
        }
    }
}

/// Everything needed to draw the map at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub base_map: &'static BaseMap,
    pub status: WidgetStatus,
    pub view: MapView,
    pub scroll_zoom: bool,
    pub polygons: Vec<PolygonLayer>,
    pub selected_marker: Option<MarkerLayer>,
    pub markers: Vec<MarkerLayer>,
}
