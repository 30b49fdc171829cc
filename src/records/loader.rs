//! Load portfolio inputs from JSON exports of the persistence layer

use super::Portfolio;
use crate::errors::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the bundled sample portfolio
pub const DEFAULT_PORTFOLIO_PATH: &str = "data/sample_portfolio.json";

/// Load a portfolio from a JSON file
pub fn load_portfolio<P: AsRef<Path>>(path: P) -> Result<Portfolio> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let portfolio = load_portfolio_from_reader(BufReader::new(file))?;
    log::debug!(
        "Loaded {} properties from {}",
        portfolio.properties.len(),
        path.display()
    );
    Ok(portfolio)
}

/// Load a portfolio from any reader (e.g. string buffer, network stream).
///
/// Accepts either a full portfolio document or a bare list of properties.
pub fn load_portfolio_from_reader<R: Read>(reader: R) -> Result<Portfolio> {
    let document: serde_json::Value = serde_json::from_reader(reader)?;
    if document.is_array() {
        return Ok(Portfolio {
            properties: serde_json::from_value(document)?,
            ..Default::default()
        });
    }
    Ok(serde_json::from_value(document)?)
}

/// Load the bundled sample portfolio
pub fn load_default_portfolio() -> Result<Portfolio> {
    load_portfolio(DEFAULT_PORTFOLIO_PATH)
}
