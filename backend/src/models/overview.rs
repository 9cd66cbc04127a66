//! Wave overview map: region code to today's wave category.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Region code -> today's category, built once and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaveOverview(BTreeMap<String, String>);

impl WaveOverview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region_code: impl Into<String>, category: impl Into<String>) {
        self.0.insert(region_code.into(), category.into());
    }

    pub fn get(&self, region_code: &str) -> Option<&str> {
        self.0.get(region_code).map(String::as_str)
    }

    /// Category for a region, empty when the region has no entry.
    pub fn category_for(&self, region_code: &str) -> &str {
        self.get(region_code).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for WaveOverview
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
