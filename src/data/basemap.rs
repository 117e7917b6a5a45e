use crate::map::LineString;
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::info;
use std::fs;
use std::path::Path;

/// Load coastline (or any outline) GeoJSON as line strings
pub fn load_basemap(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut lines = Vec::new();
    match &geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, &mut lines),
    }

    info!("basemap {}: {} lines", path.display(), lines.len());
    Ok(lines)
}

fn geometry_lines(geometry: &Geometry, lines: &mut Vec<LineString>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => lines.push(to_line(coords)),
        Value::MultiLineString(parts) => lines.extend(parts.iter().map(to_line)),
        // Exterior rings only
        Value::Polygon(rings) => lines.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => {
            lines.extend(polygons.iter().filter_map(|rings| rings.first()).map(to_line))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                geometry_lines(g, lines);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}

/// Coarse continent outlines for when no basemap file is given
pub fn simple_world() -> Vec<LineString> {
    const OUTLINES: &[&[(f64, f64)]] = &[
        // North America
        &[
            (-165.0, 68.0), (-160.0, 58.0), (-135.0, 58.0), (-124.0, 47.0),
            (-120.0, 34.0), (-106.0, 22.0), (-95.0, 16.0), (-83.0, 9.0),
            (-78.0, 8.0), (-83.0, 15.0), (-88.0, 21.0), (-97.0, 26.0),
            (-90.0, 29.5), (-82.0, 26.0), (-81.0, 31.0), (-76.0, 37.0),
            (-70.0, 42.0), (-64.0, 45.0), (-56.0, 50.0), (-62.0, 58.0),
            (-78.0, 62.0), (-94.0, 60.0), (-110.0, 69.0), (-140.0, 70.0),
            (-165.0, 68.0),
        ],
        // South America
        &[
            (-78.0, 8.0), (-72.0, 12.0), (-62.0, 10.5), (-51.0, 4.0),
            (-44.0, -2.5), (-35.0, -7.0), (-39.0, -17.0), (-44.0, -23.0),
            (-53.0, -34.0), (-62.0, -39.0), (-66.0, -47.0), (-69.0, -55.0),
            (-74.0, -50.0), (-73.0, -37.0), (-71.0, -18.0), (-81.0, -5.0),
            (-78.0, 8.0),
        ],
        // Europe
        &[
            (-9.5, 37.0), (-9.0, 43.0), (-1.5, 46.0), (-4.5, 48.5),
            (2.0, 51.0), (8.0, 54.0), (10.5, 57.5), (5.0, 59.0),
            (8.0, 63.0), (17.0, 69.0), (28.0, 71.0), (40.0, 67.0),
            (40.0, 46.0), (29.0, 41.0), (23.0, 37.0), (19.0, 40.0),
            (12.5, 44.5), (15.5, 38.0), (9.0, 44.0), (3.0, 43.0),
            (-5.5, 36.0), (-9.5, 37.0),
        ],
        // Africa
        &[
            (-17.0, 21.0), (-16.0, 12.0), (-8.0, 4.5), (5.0, 5.5),
            (9.5, 3.0), (12.0, -6.0), (13.5, -12.0), (11.5, -17.0),
            (18.0, -34.5), (26.0, -34.0), (33.0, -26.0), (35.5, -21.0),
            (40.5, -10.5), (39.5, -4.0), (51.0, 11.5), (43.0, 12.0),
            (32.5, 30.5), (20.0, 31.0), (10.0, 37.0), (-1.0, 35.5),
            (-10.0, 30.0), (-17.0, 21.0),
        ],
        // Asia
        &[
            (40.0, 46.0), (48.0, 30.0), (56.5, 25.5), (62.0, 25.0),
            (67.0, 24.0), (72.5, 21.0), (77.0, 8.0), (80.0, 15.5),
            (87.0, 21.5), (94.0, 17.0), (98.5, 8.0), (104.0, 1.5),
            (106.0, 10.0), (109.0, 15.5), (108.0, 21.5), (121.0, 31.0),
            (122.0, 40.0), (129.5, 35.5), (129.5, 42.5), (141.0, 52.0),
            (135.0, 55.0), (160.0, 61.0), (180.0, 68.0), (140.0, 73.0),
            (105.0, 78.0), (70.0, 73.0), (40.0, 67.0), (40.0, 46.0),
        ],
        // Australia
        &[
            (114.0, -22.0), (122.0, -18.0), (130.0, -12.0), (137.0, -12.5),
            (142.0, -10.5), (146.0, -19.0), (153.5, -28.0), (150.0, -37.5),
            (141.0, -38.5), (131.0, -31.5), (115.0, -34.5), (114.0, -22.0),
        ],
    ];

    OUTLINES.iter().map(|outline| outline.to_vec()).collect()
}
