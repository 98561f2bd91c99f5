//! Common types and utilities shared across all cyclone-track services.

pub mod error;
pub mod id;
pub mod record;
pub mod time;

pub use error::{CycloneError, CycloneResult};
pub use id::CycloneId;
pub use record::TrackRecord;
pub use time::{parse_dtg, parse_iso8601, valid_time};
