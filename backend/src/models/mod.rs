//! Data model: the sea-area GeoJSON layer and the wave overview.

pub mod geojson;
pub mod mercator;
pub mod overview;

pub use geojson::{
    Bounds, Feature, FeatureCollection, Geometry, LonLat, CATEGORY_PROPERTY, LABEL_PROPERTY,
    REGION_CODE_PROPERTY,
};
pub use overview::WaveOverview;
