//! Candidate scoring and ranking.
//!
//! Ordering: score descending, then known distance ascending (unknown last),
//! then rating descending, then donor id ascending.

use std::cmp::Ordering;

use crate::models::{
    Coordinates, DonorRecord, MatchResult, RequestDescriptor, ScoreBreakdown, MAX_RATING,
};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points.
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Distance between donor and request, if both carry valid coordinates.
///
/// Non-finite or out-of-range coordinates count as unknown.
pub fn donor_distance_km(request: &RequestDescriptor, donor: &DonorRecord) -> Option<f64> {
    let from = request.location.coordinates.as_ref().filter(|c| c.is_valid())?;
    let to = donor.location.coordinates.as_ref().filter(|c| c.is_valid())?;
    Some(haversine_km(from, to))
}

/// Proximity factor in (0.0, 1.0]; unknown distance scores 0.0.
pub fn proximity_factor(distance_km: Option<f64>, scale_km: f64) -> f64 {
    match distance_km {
        Some(d) => 1.0 / (1.0 + d.max(0.0) / scale_km),
        None => 0.0,
    }
}

/// Per-factor scores for a donor against a request.
pub fn score_breakdown(
    request: &RequestDescriptor,
    donor: &DonorRecord,
    distance_km: Option<f64>,
    proximity_scale_km: f64,
) -> ScoreBreakdown {
    ScoreBreakdown {
        exact_match: if donor.blood_group == request.required_group { 1.0 } else { 0.0 },
        verification: if donor.is_verified { 1.0 } else { 0.0 },
        rating: f64::from(donor.clamped_rating()) / f64::from(MAX_RATING),
        proximity: proximity_factor(distance_km, proximity_scale_km),
    }
}

/// Total order used to rank candidates, best first.
pub fn rank_order(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| compare_distance(a.distance_km, b.distance_km))
        .then_with(|| b.donor.clamped_rating().cmp(&a.donor.clamped_rating()))
        .then_with(|| a.donor.id.cmp(&b.donor.id))
}

/// Sort candidates best first. Stable for full ties.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(rank_order);
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
