//! Duplicate suppression for extracted points.

use std::collections::HashSet;

use crate::extract::CandidatePoint;

/// Decimal places positions are compared at (about 1.1 m).
pub const DEDUP_DECIMALS: i32 = 5;

/// Drop points that repeat an earlier point's position (rounded to
/// [`DEDUP_DECIMALS`]) at the same second. Points with different timestamps
/// are never merged. First occurrence wins and order is kept.
pub fn dedup_points(points: Vec<CandidatePoint>) -> Vec<CandidatePoint> {
    let scale = 10f64.powi(DEDUP_DECIMALS);
    let mut seen = HashSet::with_capacity(points.len());

    points
        .into_iter()
        .filter(|p| {
            let key = (
                (p.latitude * scale).round() as i64,
                (p.longitude * scale).round() as i64,
                p.time.map(|t| t.timestamp()),
            );
            seen.insert(key)
        })
        .collect()
}
