use thiserror::Error;

/// Errors raised by the statistics engine, the year sequence and dataset validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("cannot read {raw:?} as a finite number")]
    InvalidNumber { raw: String },

    #[error("{country}: no value for {year}")]
    MissingValue { country: String, year: String },

    #[error("{country}: value {raw:?} for {year} is not a finite number")]
    BadValue {
        country: String,
        year: String,
        raw: String,
    },

    #[error("index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("dataset has no values")]
    EmptyDataset,

    #[error("year range {first}..={last} is inverted")]
    InvalidYearRange { first: u16, last: u16 },
}

pub type Result<T> = std::result::Result<T, Error>;
