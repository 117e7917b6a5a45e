use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::map::Viewport;
use crate::stats::{radius_for, DatasetStatistics};
use log::debug;

/// Largest circle drawn, in braille pixels
pub const MAX_SYMBOL_PX: i32 = 60;

/// Extra pixels around a circle that still count as a click on it
const PICK_TOLERANCE_PX: i32 = 2;

/// Fields shown in a symbol's popup
#[derive(Debug, Clone, PartialEq)]
pub struct PopupFields {
    pub country: String,
    pub year: String,
    pub value: f64,
}

/// A sized marker for one feature in the selected year
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Index into the dataset's features
    pub feature: usize,
    pub lon: f64,
    pub lat: f64,
    /// Flannery-compensated radius in map units
    pub radius: f64,
    pub popup: PopupFields,
}

/// Convert a symbol radius to braille pixels at the current zoom
#[inline]
pub fn pixel_radius(radius: f64, symbol_scale: f64, zoom: f64) -> i32 {
    ((radius * symbol_scale * zoom).round() as i32).clamp(1, MAX_SYMBOL_PX)
}

/// Proportional symbols for the currently selected year.
///
/// Owns the dataset and its statistics; [`SymbolLayer::restyle`] is what the
/// year sequence drives on every change.
pub struct SymbolLayer {
    dataset: Dataset,
    stats: DatasetStatistics,
    base_radius: f64,
    year: String,
    /// Largest first, so smaller circles are drawn over larger ones
    symbols: Vec<Symbol>,
}

impl SymbolLayer {
    /// Compute statistics for `dataset` and style it for its first year
    pub fn new(dataset: Dataset, base_radius: f64) -> Result<Self> {
        if !(base_radius > 0.0 && base_radius.is_finite()) {
            return Err(Error::NonPositive {
                what: "base radius",
                value: base_radius,
            });
        }
        let stats = dataset.statistics()?;
        let year = dataset.years.first().cloned().ok_or(Error::EmptyDataset)?;

        let mut layer = Self {
            dataset,
            stats,
            base_radius,
            year: String::new(),
            symbols: Vec::new(),
        };
        layer.restyle(&year)?;
        Ok(layer)
    }

    /// Resize every symbol and rebuild popups for `year`.
    /// On error the previous styling is kept.
    pub fn restyle(&mut self, year: &str) -> Result<()> {
        let mut symbols = Vec::with_capacity(self.dataset.features.len());
        for (idx, feature) in self.dataset.features.iter().enumerate() {
            let value = feature.value(year)?;
            let radius = radius_for(value, self.stats.min, self.base_radius)?;
            symbols.push(Symbol {
                feature: idx,
                lon: feature.lon,
                lat: feature.lat,
                radius,
                popup: PopupFields {
                    country: feature.country.clone(),
                    year: year.to_string(),
                    value,
                },
            });
        }
        symbols.sort_by(|a, b| b.radius.total_cmp(&a.radius));

        debug!("restyled {} symbols for {year}", symbols.len());
        self.symbols = symbols;
        self.year = year.to_string();
        Ok(())
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn statistics(&self) -> &DatasetStatistics {
        &self.stats
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    pub fn symbol_for_feature(&self, feature: usize) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.feature == feature)
    }

    /// Feature whose circle covers pixel (px, py), topmost first
    pub fn pick(&self, viewport: &Viewport, symbol_scale: f64, px: i32, py: i32) -> Option<usize> {
        self.symbols.iter().rev().find_map(|symbol| {
            let (sx, sy) = viewport.project(symbol.lon, symbol.lat);
            let r = pixel_radius(symbol.radius, symbol_scale, viewport.zoom) + PICK_TOLERANCE_PX;
            let (dx, dy) = (px - sx, py - sy);
            (dx * dx + dy * dy <= r * r).then_some(symbol.feature)
        })
    }
}
