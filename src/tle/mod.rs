//! Two-line element set handling
//!
//! Parses the raw TLE text an entity is constructed from: optional name line
//! (with the historical `0 ` prefix stripped), the two element lines, and the
//! epoch encoded in line 1.

pub mod parser;
pub mod types;

pub use parser::parse_tle_epoch_to_utc;
pub use types::{TleError, TleRecord};
