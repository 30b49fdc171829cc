//! Error type for the I/O boundary of the engine
//!
//! The calculations themselves never fail; only loading inputs, writing
//! outputs and validating a requested projection window can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Years must be between 1 and {max}, got {years}")]
    InvalidWindow { years: u32, max: u32 },

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    #[error("No properties found in portfolio '{0}'")]
    EmptyPortfolio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
