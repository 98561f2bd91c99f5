//! Cyclone Track API Service Library
//!
//! Resolves cyclone identifiers to upstream ATCF decks or agency JSON feeds,
//! fetches them concurrently, and serves the assembled tracks as GeoJSON.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod service;
pub mod state;
