//! ATCF deck parser (Automated Tropical Cyclone Forecasting format).
//!
//! Decks are comma separated text with one record per line. The a-deck
//! carries forecast aids, the b-deck the best track. Both share the leading
//! columns this crate reads:
//!
//! | index | field |
//! |---|---|
//! | 0 | basin |
//! | 1 | storm number |
//! | 2 | DTG (`YYYYMMDDHH`) |
//! | 4 | technique / aid |
//! | 5 | tau (forecast hour) |
//! | 6, 7 | latitude, longitude (`125N`, `1304E`) |
//! | 8, 9 | max wind (kt), MSLP (mb) |
//!
//! Parsing is lenient: a line that cannot be decoded is skipped and the
//! rest of the deck is still read.

pub mod deck;
pub mod fields;

pub use deck::{parse_deck, parse_line, MIN_FIELDS};
pub use fields::{parse_coordinate, parse_intensity, parse_storm_number, parse_tau};
