#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use maritime_map::models::{
    Feature, FeatureCollection, Geometry, LonLat, LABEL_PROPERTY, REGION_CODE_PROPERTY,
};
use maritime_map::services::areas::{filter_by_code, AreaSource};
use maritime_map::services::{ServiceError, ServiceResult};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Path of the area file shipped with the crate.
pub const SAMPLE_AREAS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/wilayah_perairan.json");

/// Runs `f` with environment variables temporarily modified.
///
/// Restores variables on unwind and serializes access to process-global env
/// vars, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Square area with its lower-left corner at (`lon`, `lat`).
pub fn square_area(code: &str, label: &str, lon: f64, lat: f64, size: f64) -> Feature {
    let mut properties = Map::new();
    properties.insert(REGION_CODE_PROPERTY.into(), Value::String(code.into()));
    properties.insert(LABEL_PROPERTY.into(), Value::String(label.into()));
    let ring = vec![
        LonLat::new(lon, lat),
        LonLat::new(lon + size, lat),
        LonLat::new(lon + size, lat + size),
        LonLat::new(lon, lat + size),
        LonLat::new(lon, lat),
    ];
    Feature::new(Geometry::Polygon(vec![ring]), properties)
}

/// Two areas: `A1` "Laut Jawa" (centered on 106,-5) and `B2` "Laut Banda" (centered on 126,-5).
pub fn two_areas() -> FeatureCollection {
    FeatureCollection::new(vec![
        square_area("A1", "Laut Jawa", 105.0, -6.0, 2.0),
        square_area("B2", "Laut Banda", 125.0, -6.0, 2.0),
    ])
}

/// In-memory area source that counts calls and can be switched to failing.
pub struct StubAreaSource {
    collection: Mutex<Option<FeatureCollection>>,
    calls: AtomicUsize,
}

impl StubAreaSource {
    pub fn ok(collection: FeatureCollection) -> Arc<Self> {
        Arc::new(Self {
            collection: Mutex::new(Some(collection)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            collection: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_collection(&self, collection: Option<FeatureCollection>) {
        *self.collection.lock().unwrap() = collection;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn current(&self) -> ServiceResult<FeatureCollection> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.collection
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ServiceError::fetch("stub://areas", "connection refused"))
    }
}

#[async_trait]
impl AreaSource for StubAreaSource {
    async fn fetch_all(&self) -> ServiceResult<FeatureCollection> {
        self.current()
    }

    async fn fetch_by_code(&self, code: &str) -> ServiceResult<FeatureCollection> {
        self.current().map(|all| filter_by_code(&all, code))
    }
}

/// Area source whose loads never complete. Records when a load is dropped.
#[derive(Default)]
pub struct HangingAreaSource {
    pub started: AtomicBool,
    pub dropped: Arc<AtomicBool>,
}

struct SetOnDrop(Arc<AtomicBool>);

impl Drop for SetOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AreaSource for HangingAreaSource {
    async fn fetch_all(&self) -> ServiceResult<FeatureCollection> {
        self.started.store(true, Ordering::SeqCst);
        let _guard = SetOnDrop(Arc::clone(&self.dropped));
        std::future::pending::<()>().await;
        unreachable!()
    }

    async fn fetch_by_code(&self, _code: &str) -> ServiceResult<FeatureCollection> {
        self.fetch_all().await
    }
}
