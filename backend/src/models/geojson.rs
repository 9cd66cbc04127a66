//! GeoJSON types for the sea-area layer.
//!
//! Only the subset of GeoJSON the map widget uses is modelled: a
//! `FeatureCollection` of `Polygon` / `MultiPolygon` features, where a
//! feature's geometry may be `null`. Feature properties stay an open JSON
//! object, and foreign members on features (`id`, `bbox`, ...) and on the
//! collection (`name`, `crs`, ...) are preserved.
//!
//! Positions keep only longitude and latitude. The HTTP area endpoints serve
//! the file as raw JSON, not through these types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::mercator;

/// Property holding the region code that joins a feature to the wave overview.
pub const REGION_CODE_PROPERTY: &str = "WP_1";

/// Property holding the display name shown in tooltips.
pub const LABEL_PROPERTY: &str = "WP_IMM";

/// Property added by the join step with today's wave category.
pub const CATEGORY_PROPERTY: &str = "categoryToday";

/// A longitude/latitude pair, encoded as a GeoJSON position `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl TryFrom<Vec<f64>> for LonLat {
    type Error = String;

    fn try_from(position: Vec<f64>) -> Result<Self, Self::Error> {
        // Altitude (third element) is allowed by GeoJSON and ignored here.
        match position.as_slice() {
            [lon, lat, ..] => Ok(Self::new(*lon, *lat)),
            _ => Err(format!(
                "position needs at least 2 elements, got {}",
                position.len()
            )),
        }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(point: LonLat) -> Self {
        [point.lon, point.lat]
    }
}

/// Polygon geometry of a sea area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring followed by optional holes.
    Polygon(Vec<Vec<LonLat>>),
    /// Several polygons, each an outer ring followed by optional holes.
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl Geometry {
    /// Outer ring of the first polygon.
    pub fn first_outer_ring(&self) -> Option<&[LonLat]> {
        match self {
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice),
            Geometry::MultiPolygon(polygons) => polygons
                .first()
                .and_then(|rings| rings.first())
                .map(Vec::as_slice),
        }
    }

    /// Every position of every ring.
    pub fn points(&self) -> Box<dyn Iterator<Item = LonLat> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten().copied()),
            Geometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum FeatureTag {
    #[default]
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
enum CollectionTag {
    #[default]
    FeatureCollection,
}

/// One sea area: its boundary plus descriptive properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    tag: FeatureTag,
    /// `None` for an unlocated feature (`"geometry": null`).
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "nullable_properties")]
    pub properties: Map<String, Value>,
    /// Members other than `type`, `geometry` and `properties`.
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

fn nullable_properties<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            tag: FeatureTag::Feature,
            geometry: Some(geometry),
            properties,
            foreign_members: Map::new(),
        }
    }

    fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Region code (`WP_1`), if the feature carries a string one.
    pub fn region_code(&self) -> Option<&str> {
        self.string_property(REGION_CODE_PROPERTY)
    }

    /// Display label (`WP_IMM`).
    pub fn label(&self) -> Option<&str> {
        self.string_property(LABEL_PROPERTY)
    }

    /// Joined wave category; empty before the join or when the overview has no entry.
    pub fn category_today(&self) -> &str {
        self.string_property(CATEGORY_PROPERTY).unwrap_or("")
    }

    /// Copy of this feature with `categoryToday` set.
    pub fn with_category(&self, category: impl Into<String>) -> Self {
        let mut feature = self.clone();
        feature
            .properties
            .insert(CATEGORY_PROPERTY.to_string(), Value::String(category.into()));
        feature
    }

    /// Point a tooltip bound to this polygon is anchored at.
    ///
    /// Area-weighted centroid of the first outer ring, taken in Web Mercator
    /// space as Leaflet's `Polygon::getCenter` does. A ring with zero area
    /// anchors at its first position. `None` without geometry or positions.
    pub fn tooltip_anchor(&self) -> Option<LonLat> {
        let ring = self.geometry.as_ref()?.first_outer_ring()?;
        projected_ring_centroid(ring)
    }
}

fn projected_ring_centroid(ring: &[LonLat]) -> Option<LonLat> {
    let first = *ring.first()?;
    let points: Vec<(f64, f64)> = ring.iter().copied().map(mercator::project).collect();

    let mut area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = a.0 * b.1 - b.0 * a.1;
        area += cross * 3.0;
        cx += (a.0 + b.0) * cross;
        cy += (a.1 + b.1) * cross;
    }

    if area.abs() < f64::EPSILON {
        return Some(first);
    }
    Some(mercator::unproject(cx / area, cy / area))
}

/// Ordered collection of sea-area features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default)]
    tag: CollectionTag,
    pub features: Vec<Feature>,
    /// Top-level members other than `type` and `features`.
    #[serde(flatten)]
    pub foreign_members: Map<String, Value>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            features,
            foreign_members: Map::new(),
        }
    }

    /// Same document with its features replaced.
    pub fn with_features(&self, features: Vec<Feature>) -> Self {
        Self {
            tag: self.tag,
            features,
            foreign_members: self.foreign_members.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Combined extent of every feature; `None` when there are no positions.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(
            self.features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .flat_map(Geometry::points),
        )
    }
}

/// Axis-aligned lon/lat rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LonLat,
    pub north_east: LonLat,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = LonLat>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LonLat) {
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.south_west.lon + self.north_east.lon) / 2.0,
            (self.south_west.lat + self.north_east.lat) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(lon: f64, lat: f64, size: f64) -> Vec<LonLat> {
        vec![
            LonLat::new(lon, lat),
            LonLat::new(lon + size, lat),
            LonLat::new(lon + size, lat + size),
            LonLat::new(lon, lat + size),
            LonLat::new(lon, lat),
        ]
    }

    #[test]
    fn test_parse_feature_collection_keeps_foreign_members() {
        let raw = json!({
            "type": "FeatureCollection",
            "name": "wilayah_perairan",
            "features": [{
                "type": "Feature",
                "properties": { "WP_1": "A1", "WP_IMM": "Selat Sunda", "OBJECTID": 7 },
                "geometry": { "type": "Polygon", "coordinates": [[[105.0, -6.0], [106.0, -6.0], [106.0, -5.0], [105.0, -6.0]]] }
            }]
        });

        let fc: FeatureCollection = serde_json::from_value(raw).unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(fc.foreign_members["name"], "wilayah_perairan");
        assert_eq!(fc.features[0].region_code(), Some("A1"));
        assert_eq!(fc.features[0].label(), Some("Selat Sunda"));

        let back = serde_json::to_value(&fc).unwrap();
        assert_eq!(back["type"], "FeatureCollection");
        assert_eq!(back["name"], "wilayah_perairan");
        assert_eq!(back["features"][0]["properties"]["OBJECTID"], 7);
        assert_eq!(back["features"][0]["geometry"]["coordinates"][0][1], json!([106.0, -6.0]));
    }

    #[test]
    fn test_null_properties_become_empty() {
        let raw = json!({
            "type": "Feature",
            "properties": null,
            "geometry": { "type": "Polygon", "coordinates": [] }
        });
        let feature: Feature = serde_json::from_value(raw).unwrap();
        assert!(feature.properties.is_empty());
        assert_eq!(feature.region_code(), None);
        assert_eq!(feature.category_today(), "");
    }

    #[test]
    fn test_position_with_altitude_is_accepted() {
        let point: LonLat = serde_json::from_value(json!([110.5, -7.25, 12.0])).unwrap();
        assert_eq!(point, LonLat::new(110.5, -7.25));
        assert!(serde_json::from_value::<LonLat>(json!([110.5])).is_err());
    }

    #[test]
    fn test_unsupported_geometry_is_rejected() {
        let raw = json!({
            "type": "Feature",
            "properties": {},
            "geometry": { "type": "Point", "coordinates": [1.0, 2.0] }
        });
        assert!(serde_json::from_value::<Feature>(raw).is_err());
    }

    #[test]
    fn test_feature_foreign_members_and_null_geometry() {
        let raw = json!({
            "type": "Feature",
            "id": "area-1",
            "bbox": [1.0, 2.0, 3.0, 4.0],
            "properties": { "WP_1": "A1" },
            "geometry": null
        });
        let feature: Feature = serde_json::from_value(raw).unwrap();
        assert!(feature.geometry.is_none());
        assert!(feature.tooltip_anchor().is_none());
        assert_eq!(feature.foreign_members["id"], "area-1");

        let back = serde_json::to_value(&feature).unwrap();
        assert_eq!(back["id"], "area-1");
        assert_eq!(back["bbox"], json!([1.0, 2.0, 3.0, 4.0]));
        assert!(back["geometry"].is_null());
    }

    #[test]
    fn test_collection_with_unlocated_feature_decodes() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "WP_1": "A1" }, "geometry": null },
                { "type": "Feature", "properties": { "WP_1": "B2" },
                  "geometry": { "type": "Polygon", "coordinates": [[[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]]] } }
            ]
        });
        let fc: FeatureCollection = serde_json::from_value(raw).unwrap();
        assert_eq!(fc.len(), 2);
        let bounds = fc.bounds().unwrap();
        assert_eq!(bounds.south_west, LonLat::new(1.0, 1.0));
        assert_eq!(bounds.north_east, LonLat::new(2.0, 2.0));
    }

    #[test]
    fn test_tooltip_anchor_is_projected_ring_centroid() {
        let feature = Feature::new(Geometry::Polygon(vec![square(100.0, -10.0, 2.0)]), Map::new());
        let anchor = feature.tooltip_anchor().unwrap();
        assert!((anchor.lon - 101.0).abs() < 1e-9);
        // Mercator stretches away from the equator, pulling the centroid south of -9.
        assert!(anchor.lat < -9.0 && anchor.lat > -9.01, "lat {}", anchor.lat);
    }

    #[test]
    fn test_tooltip_anchor_uses_first_polygon_of_multipolygon() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![square(120.0, 0.0, 1.0)],
            vec![square(130.0, 5.0, 4.0)],
        ]);
        let anchor = Feature::new(geometry, Map::new()).tooltip_anchor().unwrap();
        assert!((anchor.lon - 120.5).abs() < 1e-9);
        assert!((anchor.lat - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_tooltip_anchor_zero_area_ring_uses_first_position() {
        let ring = vec![LonLat::new(3.0, 5.0), LonLat::new(3.0, 5.0), LonLat::new(3.0, 5.0)];
        let anchor = Feature::new(Geometry::Polygon(vec![ring]), Map::new())
            .tooltip_anchor()
            .unwrap();
        assert_eq!(anchor, LonLat::new(3.0, 5.0));

        let empty = Feature::new(Geometry::Polygon(vec![]), Map::new());
        assert!(empty.tooltip_anchor().is_none());
    }

    #[test]
    fn test_collection_bounds_spans_all_features() {
        let fc = FeatureCollection::new(vec![
            Feature::new(Geometry::Polygon(vec![square(95.0, -11.0, 1.0)]), Map::new()),
            Feature::new(
                Geometry::MultiPolygon(vec![vec![square(140.0, 5.0, 1.0)]]),
                Map::new(),
            ),
        ]);
        let bounds = fc.bounds().unwrap();
        assert_eq!(bounds.south_west, LonLat::new(95.0, -11.0));
        assert_eq!(bounds.north_east, LonLat::new(141.0, 6.0));
        assert_eq!(bounds.center(), LonLat::new(118.0, -2.5));

        assert!(FeatureCollection::new(vec![]).bounds().is_none());
    }
}
