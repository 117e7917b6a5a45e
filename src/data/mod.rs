mod basemap;
mod sample;

pub use basemap::{load_basemap, simple_world};
pub use sample::sample_dataset;

use crate::error::{Error, Result};
use crate::stats::{compute_statistics, parse_value, DatasetStatistics};
use anyhow::{bail, Context};
use geojson::{GeoJson, Geometry, JsonObject, JsonValue, Value};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Inclusive range of calendar years carried by every feature.
/// Its labels (`"2013"`, `"2014"`, ...) are the year attributes of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    first: u16,
    last: u16,
}

impl YearRange {
    pub fn new(first: u16, last: u16) -> Result<Self> {
        if first > last {
            return Err(Error::InvalidYearRange { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    pub fn last(&self) -> u16 {
        self.last
    }

    /// Year labels in ascending order
    pub fn labels(&self) -> Vec<String> {
        (self.first..=self.last).map(|y| y.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    pub fn contains_label(&self, label: &str) -> bool {
        label
            .parse::<u16>()
            .map(|y| (self.first..=self.last).contains(&y))
            .unwrap_or(false)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: 2013,
            last: 2020,
        }
    }
}

/// One country: display name, marker position and its raw properties
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub country: String,
    pub lon: f64,
    pub lat: f64,
    pub properties: JsonObject,
}

impl Feature {
    pub fn new(country: &str, lon: f64, lat: f64, properties: JsonObject) -> Self {
        Self {
            country: country.to_string(),
            lon,
            lat,
            properties,
        }
    }

    /// Numeric value for a year label.
    /// Accepts comma-grouped strings as well as plain JSON numbers.
    pub fn value(&self, year: &str) -> Result<f64> {
        let bad = |raw: String| Error::BadValue {
            country: self.country.clone(),
            year: year.to_string(),
            raw,
        };

        match self.properties.get(year) {
            None | Some(JsonValue::Null) => Err(Error::MissingValue {
                country: self.country.clone(),
                year: year.to_string(),
            }),
            Some(JsonValue::String(s)) => parse_value(s).map_err(|_| bad(s.clone())),
            Some(JsonValue::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(bad(n.to_string())),
            },
            Some(other) => Err(bad(other.to_string())),
        }
    }
}

/// Features plus the ordered year labels they are sequenced over
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<Feature>,
    pub years: Vec<String>,
}

impl Dataset {
    /// Read a GeoJSON feature collection from disk
    pub fn load(path: &Path, range: YearRange, name_field: &str) -> anyhow::Result<Self> {
        let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let dataset = Self::from_geojson_bytes(&mut bytes, range, name_field)
            .with_context(|| format!("loading {}", path.display()))?;
        info!(
            "loaded {} features from {} (years {})",
            dataset.features.len(),
            path.display(),
            dataset.years.join(",")
        );
        Ok(dataset)
    }

    /// Parse raw GeoJSON text. The buffer is used as scratch space by the parser.
    pub fn from_geojson_bytes(bytes: &mut [u8], range: YearRange, name_field: &str) -> anyhow::Result<Self> {
        let geojson: GeoJson = simd_json::serde::from_slice(bytes).context("parsing GeoJSON")?;
        Self::from_geojson(geojson, range, name_field)
    }

    pub fn from_geojson(geojson: GeoJson, range: YearRange, name_field: &str) -> anyhow::Result<Self> {
        let raw_features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => bail!("expected a feature collection, found a bare geometry"),
        };

        let mut features = Vec::with_capacity(raw_features.len());
        for (idx, raw) in raw_features.into_iter().enumerate() {
            let properties = raw.properties.unwrap_or_default();
            let country = display_name(&properties, name_field)
                .unwrap_or_else(|| format!("Feature {idx}"));

            let Some((lon, lat)) = raw.geometry.as_ref().and_then(representative_point) else {
                warn!("skipping {country}: no usable geometry");
                continue;
            };

            features.push(Feature {
                country,
                lon,
                lat,
                properties,
            });
        }

        let dataset = Self::new(features, range)?;
        Ok(dataset)
    }

    /// Build from already-parsed features, checking the year schema
    /// against the first feature
    pub fn new(features: Vec<Feature>, range: YearRange) -> Result<Self> {
        let first = features.first().ok_or(Error::EmptyDataset)?;
        let years = range.labels();
        if let Some(missing) = years.iter().find(|y| !first.properties.contains_key(y.as_str())) {
            return Err(Error::MissingValue {
                country: first.country.clone(),
                year: missing.clone(),
            });
        }

        let extra: Vec<&str> = first
            .properties
            .keys()
            .filter(|k| looks_like_year(k) && !range.contains_label(k))
            .map(String::as_str)
            .collect();
        if !extra.is_empty() {
            warn!("ignoring year columns outside {}..={}: {}", range.first(), range.last(), extra.join(","));
        }

        Ok(Self { features, years })
    }

    pub fn statistics(&self) -> Result<DatasetStatistics> {
        compute_statistics(&self.features, &self.years)
    }
}

fn looks_like_year(key: &str) -> bool {
    key.len() == 4 && key.bytes().all(|b| b.is_ascii_digit())
}

/// Display name from the configured field, falling back to common spellings
fn display_name(properties: &JsonObject, name_field: &str) -> Option<String> {
    [name_field, "country", "Country", "name", "NAME"]
        .iter()
        .find_map(|key| properties.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Marker position for a geometry: the point itself, or the centre of the
/// bounding box of every coordinate for anything larger
fn representative_point(geometry: &Geometry) -> Option<(f64, f64)> {
    if let Value::Point(coords) = &geometry.value {
        return (coords.len() >= 2).then(|| (coords[0], coords[1]));
    }

    let mut positions = Vec::new();
    collect_positions(&geometry.value, &mut positions);
    if positions.is_empty() {
        return None;
    }

    let (mut min_lon, mut min_lat) = (f64::INFINITY, f64::INFINITY);
    let (mut max_lon, mut max_lat) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (lon, lat) in positions {
        min_lon = min_lon.min(lon);
        max_lon = max_lon.max(lon);
        min_lat = min_lat.min(lat);
        max_lat = max_lat.max(lat);
    }
    Some(((min_lon + max_lon) / 2.0, (min_lat + max_lat) / 2.0))
}

fn collect_positions(value: &Value, out: &mut Vec<(f64, f64)>) {
    let coords: Vec<&Vec<f64>> = match value {
        Value::Point(c) => vec![c],
        Value::MultiPoint(cs) | Value::LineString(cs) => cs.iter().collect(),
        Value::MultiLineString(lines) => lines.iter().flatten().collect(),
        Value::Polygon(rings) => rings.iter().take(1).flatten().collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first())
            .flatten()
            .collect(),
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_positions(&g.value, out);
            }
            return;
        }
    };

    out.extend(coords.into_iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])));
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "geometry": {"type": "Point", "coordinates": [2.35, 48.85]},
             "properties": {"Country": "France", "2013": "83,634,000", "2014": "83,701,000"}},
            {"type": "Feature",
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,4],[0,4],[0,0]]]},
             "properties": {"Country": "Boxland", "2013": 1200, "2014": "1,300"}},
            {"type": "Feature",
             "geometry": null,
             "properties": {"Country": "Nowhere", "2013": "1", "2014": "2"}}
        ]
    }"#;

    fn range_13_14() -> YearRange {
        YearRange::new(2013, 2014).unwrap()
    }

    #[test]
    fn test_year_range_labels() {
        let range = YearRange::default();
        assert_eq!(range.len(), 8);
        assert_eq!(range.labels().first().map(String::as_str), Some("2013"));
        assert_eq!(range.labels().last().map(String::as_str), Some("2020"));
        assert!(range.contains_label("2017"));
        assert!(!range.contains_label("2021"));
        assert!(!range.contains_label("Country"));
    }

    #[test]
    fn test_single_year_range() {
        let range = YearRange::new(2016, 2016).unwrap();
        assert_eq!((range.first(), range.last()), (2016, 2016));
        assert_eq!(range.len(), 1);
        assert_eq!(range.labels(), vec!["2016"]);
    }

    #[test]
    fn test_inverted_range() {
        assert_eq!(
            YearRange::new(2020, 2013),
            Err(Error::InvalidYearRange { first: 2020, last: 2013 })
        );
    }

    #[test]
    fn test_parse_collection() {
        let mut bytes = COLLECTION.as_bytes().to_vec();
        let dataset = Dataset::from_geojson_bytes(&mut bytes, range_13_14(), "Country").unwrap();

        assert_eq!(dataset.years, vec!["2013", "2014"]);
        assert_eq!(dataset.features.len(), 2);

        let france = &dataset.features[0];
        assert_eq!(france.country, "France");
        assert_eq!((france.lon, france.lat), (2.35, 48.85));
        assert_eq!(france.value("2013").unwrap(), 83_634_000.0);

        let boxland = &dataset.features[1];
        assert_eq!((boxland.lon, boxland.lat), (5.0, 2.0));
        assert_eq!(boxland.value("2013").unwrap(), 1200.0);
        assert_eq!(boxland.value("2014").unwrap(), 1300.0);
    }

    #[test]
    fn test_statistics_over_loaded_collection() {
        let mut bytes = COLLECTION.as_bytes().to_vec();
        let dataset = Dataset::from_geojson_bytes(&mut bytes, range_13_14(), "Country").unwrap();
        let stats = dataset.statistics().unwrap();
        assert_eq!(stats.min, 1200.0);
        assert_eq!(stats.max, 83_701_000.0);
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_first_feature_must_carry_every_year() {
        let mut bytes = COLLECTION.as_bytes().to_vec();
        let err = Dataset::from_geojson_bytes(&mut bytes, YearRange::new(2013, 2015).unwrap(), "Country")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::MissingValue {
                country: "France".into(),
                year: "2015".into(),
            })
        );
    }

    #[test]
    fn test_bare_geometry_rejected() {
        let mut bytes = br#"{"type": "Point", "coordinates": [1, 2]}"#.to_vec();
        assert!(Dataset::from_geojson_bytes(&mut bytes, range_13_14(), "Country").is_err());
    }

    #[test]
    fn test_value_variants() {
        let props = serde_json::json!({"2013": null, "2014": true, "2015": 7.5})
            .as_object()
            .cloned()
            .unwrap();
        let f = Feature::new("X", 0.0, 0.0, props);
        assert!(matches!(f.value("2013"), Err(Error::MissingValue { .. })));
        assert!(matches!(f.value("2014"), Err(Error::BadValue { .. })));
        assert_eq!(f.value("2015").unwrap(), 7.5);
        assert!(matches!(f.value("2016"), Err(Error::MissingValue { .. })));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let props = serde_json::json!({"name": "Atlantis"}).as_object().cloned().unwrap();
        assert_eq!(display_name(&props, "Country").as_deref(), Some("Atlantis"));
        assert_eq!(display_name(&JsonObject::new(), "Country"), None);
    }
}
