//! Map view: center, zoom and bounds fitting under Web Mercator.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::mercator::{project_lat, unproject_y};
use crate::models::{Bounds, LonLat};

/// Tile edge in pixels; the world is `TILE_SIZE * 2^zoom` pixels wide.
pub const TILE_SIZE: f64 = 256.0;

/// Viewport size in pixels, used when fitting bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

/// Current view of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LonLat,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl MapView {
    pub fn new(center: LonLat, zoom: u8, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    /// Moves the view; zoom is clamped to `[min_zoom, max_zoom]`.
    pub fn set_view(&mut self, center: LonLat, zoom: u8) {
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Centers on `bounds` at the largest whole zoom that shows all of it.
    pub fn fit_bounds(&mut self, bounds: &Bounds, viewport: Viewport) {
        let zoom = bounds_zoom(bounds, viewport, self.max_zoom);
        self.set_view(projected_center(bounds), zoom);
    }
}

fn projected_center(bounds: &Bounds) -> LonLat {
    let y = (project_lat(bounds.south_west.lat) + project_lat(bounds.north_east.lat)) / 2.0;
    LonLat::new(
        (bounds.south_west.lon + bounds.north_east.lon) / 2.0,
        unproject_y(y),
    )
}

fn bounds_zoom(bounds: &Bounds, viewport: Viewport, max_zoom: u8) -> u8 {
    // Fractions of the world's width / height covered by the bounds.
    let dx = (bounds.north_east.lon - bounds.south_west.lon) / 360.0;
    let dy = (project_lat(bounds.north_east.lat) - project_lat(bounds.south_west.lat)) / (2.0 * PI);

    let fit = |extent: f64, pixels: u32| {
        if extent <= 0.0 {
            f64::INFINITY
        } else {
            (pixels as f64 / (TILE_SIZE * extent)).log2()
        }
    };

    let zoom = fit(dx, viewport.width).min(fit(dy, viewport.height)).floor();
    if zoom.is_infinite() {
        return max_zoom;
    }
    zoom.clamp(0.0, u8::MAX as f64) as u8
}
