use crate::data::Feature;
use crate::error::{Error, Result};

/// Flannery's appearance-compensation coefficient for proportional circles
pub const FLANNERY_COEFFICIENT: f64 = 1.0083;

/// Flannery's appearance-compensation exponent
pub const FLANNERY_EXPONENT: f64 = 0.5715;

/// Radius of a symbol whose value equals the dataset minimum, before compensation
pub const DEFAULT_BASE_RADIUS: f64 = 5.0;

/// Parse a comma-grouped numeral such as `"1,234,567"`.
///
/// Every `,` is dropped before parsing, so malformed grouping (`"1,23,4"`) is
/// accepted as long as the digits form a number. Empty input, text and
/// non-finite results (`"inf"`, `"NaN"`) are rejected.
pub fn parse_value(raw: &str) -> Result<f64> {
    let digits: String = raw.chars().filter(|&c| c != ',').collect();
    match digits.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::InvalidNumber {
            raw: raw.to_string(),
        }),
    }
}

/// Format a value with `,` thousands separators, rounded to an integer
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Summary of every (feature, year) value in a dataset.
/// Computed once per load and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Number of values the summary was built from
    pub count: usize,
}

impl DatasetStatistics {
    /// Summarize a flat sequence of finite values
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        if count == 0 {
            return Err(Error::EmptyDataset);
        }

        Ok(Self {
            min,
            max,
            // Rounding in the sum can push the quotient just past an extreme
            mean: (sum / count as f64).clamp(min, max),
            count,
        })
    }
}

/// Compute min/max/mean over all features and all `years`.
///
/// The mean is taken over the flattened set of values, not over per-year
/// means. Aborts on the first value that cannot be read, naming the feature
/// and year.
pub fn compute_statistics(features: &[Feature], years: &[String]) -> Result<DatasetStatistics> {
    let mut values = Vec::with_capacity(features.len() * years.len());
    for feature in features {
        for year in years {
            values.push(feature.value(year)?);
        }
    }
    DatasetStatistics::from_values(values)
}

/// Symbol radius for `value`, scaled against the global minimum with
/// Flannery compensation: `1.0083 * (value / min_value)^0.5715 * base_radius`.
#[inline]
pub fn radius_for(value: f64, min_value: f64, base_radius: f64) -> Result<f64> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(Error::NonPositive { what: "value", value });
    }
    if !(min_value > 0.0 && min_value.is_finite()) {
        return Err(Error::NonPositive {
            what: "minimum value",
            value: min_value,
        });
    }
    Ok(FLANNERY_COEFFICIENT * (value / min_value).powf(FLANNERY_EXPONENT) * base_radius)
}
