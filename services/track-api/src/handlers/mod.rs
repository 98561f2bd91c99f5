//! HTTP request handlers for the track API.

pub mod cyclone;
pub mod health;
