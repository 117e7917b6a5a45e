//! Proportional-symbol map of inbound tourism, drawn in the terminal.
//!
//! The computational core is [`stats`] (value parsing, dataset statistics and
//! the symbol radius curve) and [`sequence`] (the cyclic year selector). The
//! remaining modules load data and draw it with ratatui.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod sequence;
pub mod stats;
pub mod ui;

pub use error::{Error, Result};
