//! Donor models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BloodGroup;

/// Highest donor rating, in tenths of a star (5.0 stars).
pub const MAX_RATING: u8 = 50;

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both components are finite and within their ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Where a donor lives or where blood is needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    /// District name as entered (e.g., "Dhaka")
    pub district: String,
    /// Geocoded position, if known
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Location known only by district.
    pub fn district(district: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            coordinates: None,
        }
    }

    /// Location with a geocoded position.
    pub fn at(district: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            district: district.into(),
            coordinates: Some(Coordinates::new(lat, lon)),
        }
    }
}

/// A donor's matching-relevant state at query time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonorRecord {
    /// Donor ID from the user store; also the final ranking tie-break
    pub id: u64,
    /// Donor blood group
    pub blood_group: BloodGroup,
    /// Self-reported willingness to donate
    pub is_available: bool,
    /// Most recent donation, `None` if never donated
    pub last_donation_date: Option<NaiveDate>,
    /// Identity/document verification status
    pub is_verified: bool,
    /// Rating in tenths of a star (0-50)
    pub rating: u8,
    /// Home location
    pub location: Location,
}

impl DonorRecord {
    /// Create an available, unverified, never-donated donor.
    pub fn new(id: u64, blood_group: BloodGroup, location: Location) -> Self {
        Self {
            id,
            blood_group,
            is_available: true,
            last_donation_date: None,
            is_verified: false,
            rating: 0,
            location,
        }
    }

    /// Rating clamped to `0..=MAX_RATING`.
    pub fn clamped_rating(&self) -> u8 {
        self.rating.min(MAX_RATING)
    }
}
