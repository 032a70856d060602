//! TLE data types

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::tle::parser::parse_tle_epoch_to_utc;

/// Errors raised while parsing a TLE text block.
#[derive(Debug, Error)]
pub enum TleError {
    #[error("TLE must contain at least two element lines")]
    TooShort,
    #[error("malformed TLE: {0}")]
    Malformed(String),
    #[error("unparseable epoch field in TLE line 1")]
    BadEpoch,
}

/// A parsed two-line element set, with its optional name line.
#[derive(Clone, Debug)]
pub struct TleRecord {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub epoch_utc: DateTime<Utc>,
}

impl TleRecord {
    /// Parse a 2- or 3-line TLE block. A leading `0 ` on the name line (the
    /// historical NORAD format) is stripped.
    pub fn parse(text: &str) -> Result<Self, TleError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();

        let (name, line1, line2) = match lines.as_slice() {
            [l1, l2] => (None, *l1, *l2),
            [l0, l1, l2, ..] => {
                let name = l0.strip_prefix("0 ").unwrap_or(l0).trim().to_string();
                (Some(name), *l1, *l2)
            }
            _ => return Err(TleError::TooShort),
        };

        if !line1.starts_with("1 ") {
            return Err(TleError::Malformed(format!(
                "line 1 must start with '1 ': {line1:?}"
            )));
        }
        if !line2.starts_with("2 ") {
            return Err(TleError::Malformed(format!(
                "line 2 must start with '2 ': {line2:?}"
            )));
        }

        let epoch_utc = parse_tle_epoch_to_utc(line1).ok_or(TleError::BadEpoch)?;
        Ok(Self {
            name,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch_utc,
        })
    }

    /// Display name for the satellite, falling back to its catalog number.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let norad = self.line1.get(2..7).unwrap_or("?????").trim();
                format!("NORAD {norad}")
            }
        }
    }
}
