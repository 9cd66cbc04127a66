//! HTTP server module for the maritime map.
//!
//! This module provides an axum-based HTTP server that exposes the area
//! layer, the build-time wave overview and the rendered map scene.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Path/query extraction                                  │
//! │  - JSON serialization                                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Page Shell + Map Widget                                  │
//! │  - Wave overview built once at startup                    │
//! │  - Join and render model                                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Area Data Service                                        │
//! │  - Static GeoJSON file, re-read per request               │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
