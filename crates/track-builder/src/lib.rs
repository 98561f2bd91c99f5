//! Track selection and feature assembly.
//!
//! Raw records for one cyclone go in, a [`TrackFeatureCollection`] comes out.
//! Deck records arrive already decoded; feed points are first turned into
//! records by [`records_from_points`].
//!
//! [`TrackFeatureCollection`]: track_protocol::TrackFeatureCollection

pub mod features;
pub mod normalize;
pub mod select;

pub use features::{build_features, FeatureContext, TrackInputs};
pub use normalize::{records_from_points, FeedLabels};
pub use select::{select_best_track, select_forecast, BEST_TECHNIQUE, CONSENSUS_TECHNIQUE};
