//! Position extraction from schema-less agency JSON feeds.
//!
//! Agency feeds move fields around between deployments, so nothing here is
//! bound to a fixed schema. The document is walked as a generic JSON tree and
//! every object holding a latitude/longitude pair under one of the known key
//! aliases (see [`keys`]) is reported with its path and a coarse kind hint.
//!
//! The walk tolerates spurious coordinate-shaped pairs. Callers run
//! [`dedup_points`] and drop points they cannot place in time.

pub mod dedup;
pub mod error;
pub mod extract;
pub mod keys;
pub mod meta;
pub mod path;
pub mod values;

pub use dedup::{dedup_points, DEDUP_DECIMALS};
pub use error::{FeedError, FeedResult};
pub use extract::{extract_points, extract_points_from_str, parse_feed, CandidatePoint};
pub use meta::{extract_event_entries, extract_event_ids, extract_name};
pub use path::{JsonPath, PathSegment};
