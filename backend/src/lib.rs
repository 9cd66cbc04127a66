//! # Maritime Map
//!
//! Interactive maritime map backend for Indonesian sea areas.
//!
//! The crate serves a static GeoJSON layer of sea areas, fetches the daily
//! wave-height overview once at startup, joins each area's category onto the
//! layer and models the map widget that colors, labels and selects areas.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: GeoJSON types and the wave overview map
//! - [`services`]: Color mapping, area data, overview fetching and the join step
//! - [`widget`]: Headless map widget (load lifecycle, selection, hover, render model)
//! - [`page`]: Page shell that builds the overview once and feeds the widget
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Data flow
//!
//! ```text
//! overview feed ──▶ PageShell ──▶ MapWidget ◀── AreaSource (static GeoJSON)
//!                                    │
//!                                    ▼
//!                        join ──▶ color ──▶ MapScene
//! ```

pub mod config;
pub mod models;
pub mod page;
pub mod services;
pub mod widget;

#[cfg(feature = "http-server")]
pub mod http;
