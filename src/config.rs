use crate::data::YearRange;
use crate::error::{Error, Result};
use crate::stats::DEFAULT_BASE_RADIUS;
use clap::Parser;
use std::path::PathBuf;

/// Command-line configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "tourism-map", version, about = "Inbound tourism as proportional symbols, in the terminal")]
pub struct Config {
    /// GeoJSON feature collection with one point per country
    #[arg(long, default_value = "data/InboundTouristData.geojson")]
    pub data: PathBuf,

    /// Optional coastline GeoJSON drawn under the symbols
    #[arg(long)]
    pub basemap: Option<PathBuf>,

    /// First year column (inclusive)
    #[arg(long, default_value_t = 2013)]
    pub first_year: u16,

    /// Last year column (inclusive)
    #[arg(long, default_value_t = 2020)]
    pub last_year: u16,

    /// Property holding the country name
    #[arg(long, default_value = "Country")]
    pub name_field: String,

    /// Radius of the smallest symbol before Flannery compensation
    #[arg(long, default_value_t = DEFAULT_BASE_RADIUS)]
    pub base_radius: f64,

    /// Braille pixels per unit of symbol radius at zoom 1
    #[arg(long, default_value_t = 0.25)]
    pub symbol_scale: f64,

    /// Write logs to this file (RUST_LOG sets the filter)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/InboundTouristData.geojson"),
            basemap: None,
            first_year: 2013,
            last_year: 2020,
            name_field: "Country".to_string(),
            base_radius: DEFAULT_BASE_RADIUS,
            symbol_scale: 0.25,
            log_file: None,
        }
    }
}

impl Config {
    /// Check numeric settings and return the year range
    pub fn validate(&self) -> Result<YearRange> {
        for (what, value) in [("base radius", self.base_radius), ("symbol scale", self.symbol_scale)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(Error::NonPositive { what, value });
            }
        }
        YearRange::new(self.first_year, self.last_year)
    }
}
