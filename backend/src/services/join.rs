//! Joins the wave overview onto the area layer.

use crate::models::{FeatureCollection, WaveOverview};

/// Sets `categoryToday` on every feature from `overview[regionCode]`, or `""`
/// when the overview has no entry (or the feature has no region code).
///
/// Neither input is modified; features keep their order and count.
pub fn join_overview(collection: &FeatureCollection, overview: &WaveOverview) -> FeatureCollection {
    let features = collection
        .features
        .iter()
        .map(|feature| {
            let category = feature
                .region_code()
                .map(|code| overview.category_for(code))
                .unwrap_or("");
            feature.with_category(category)
        })
        .collect();
    collection.with_features(features)
}
