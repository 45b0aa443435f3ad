//! PulseCare Core Library
//!
//! Blood compatibility, donor eligibility and emergency match ranking.
//!
//! # Architecture
//!
//! ```text
//! RequestDescriptor + [DonorRecord]
//!               │
//!     ┌─────────▼─────────┐
//!     │   Compatibility   │  donor group can serve requested group
//!     └─────────┬─────────┘
//!     ┌─────────▼─────────┐
//!     │    Eligibility    │  available, ≥120 days since last donation
//!     └─────────┬─────────┘
//!     ┌─────────▼─────────┐
//!     │      Scoring      │  exact match, verification, rating,
//!     │                   │  proximity (weighted by urgency)
//!     └─────────┬─────────┘
//!     ┌─────────▼─────────┐
//!     │   Rank + Limit    │  score ↓, distance ↑, rating ↓, id ↑
//!     └─────────┬─────────┘
//!               │
//!         [MatchResult] ──► MatchReport (alert broadcast / audit)
//! ```
//!
//! # Core Principle
//!
//! **The engine is pure.** It reads no clock inside rule logic, owns no
//! mutable state, and never mutates its inputs. Fetching donors and
//! delivering alerts belong to the caller.
//!
//! # Modules
//!
//! - [`models`]: Domain types (BloodGroup, DonorRecord, RequestDescriptor, MatchResult)
//! - [`matcher`]: Compatibility, eligibility, scoring policy and ranking
//! - [`directory`]: Donor directory search
//! - [`export`]: Match report export

pub mod directory;
pub mod export;
pub mod matcher;
pub mod models;

// Re-export commonly used types
pub use directory::{search_donors, DonorQuery};
pub use export::MatchReport;
pub use matcher::{match_donors, EngineResult, MatchError, MatchOptions, Matcher, ScoringPolicy};
pub use models::{
    BloodGroup, Coordinates, DonorRecord, Eligibility, Location, MatchResult, RequestDescriptor,
    Urgency,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PulseCareError {
    #[error("Invalid blood group: {0}")]
    InvalidBloodGroup(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<MatchError> for PulseCareError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::InvalidBloodGroup(raw) => PulseCareError::InvalidBloodGroup(raw),
            MatchError::InvalidRequest(msg) => PulseCareError::InvalidRequest(msg),
        }
    }
}

impl From<serde_json::Error> for PulseCareError {
    fn from(e: serde_json::Error) -> Self {
        PulseCareError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine with the default scoring policy.
#[uniffi::export]
pub fn new_match_engine() -> Arc<MatchEngine> {
    Arc::new(MatchEngine {
        matcher: Matcher::default(),
    })
}

/// Create an engine from a JSON scoring policy.
#[uniffi::export]
pub fn match_engine_with_policy(policy_json: String) -> Result<Arc<MatchEngine>, PulseCareError> {
    let policy = ScoringPolicy::from_json(&policy_json)?;
    Ok(Arc::new(MatchEngine {
        matcher: Matcher::new(policy)?,
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Matching engine handle for the API layer. Holds only the policy.
#[derive(uniffi::Object)]
pub struct MatchEngine {
    matcher: Matcher,
}

#[uniffi::export]
impl MatchEngine {
    /// Rank compatible, eligible donors for a request.
    pub fn match_donors(
        &self,
        request: FfiRequest,
        donors: Vec<FfiDonorRecord>,
        limit: Option<u32>,
        reference_date: Option<String>,
    ) -> Result<Vec<FfiMatchResult>, PulseCareError> {
        let request = RequestDescriptor::try_from(request)?;
        let donors = convert_donors(donors)?;
        let options = match_options(limit, reference_date)?;

        let results = self.matcher.match_donors(&request, &donors, &options)?;
        Ok(results.into_iter().map(|r| r.into()).collect())
    }

    /// Whether `donor_group` can give to `required_group`.
    pub fn is_compatible(
        &self,
        donor_group: String,
        required_group: String,
    ) -> Result<bool, PulseCareError> {
        Ok(matcher::is_compatible_labels(&required_group, &donor_group)?)
    }

    /// Eligibility of one donor at a date (today when absent).
    pub fn check_eligibility(
        &self,
        donor: FfiDonorRecord,
        reference_date: Option<String>,
    ) -> Result<FfiEligibility, PulseCareError> {
        let donor = DonorRecord::try_from(donor)?;
        let reference_date = parse_date(reference_date.as_deref())?
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        let eligibility = matcher::check_eligibility(&donor, reference_date);
        Ok(FfiEligibility {
            eligible: eligibility.is_eligible(),
            reason: eligibility.reason().map(String::from),
            days_until_eligible: eligibility.days_until_eligible(),
            next_eligible_date: matcher::next_eligible_date(&donor, reference_date)
                .map(|d| d.to_string()),
        })
    }

    /// Match and export the run as a JSON report.
    pub fn match_report_json(
        &self,
        request: FfiRequest,
        donors: Vec<FfiDonorRecord>,
        limit: Option<u32>,
        reference_date: Option<String>,
    ) -> Result<String, PulseCareError> {
        let request = RequestDescriptor::try_from(request)?;
        let donors = convert_donors(donors)?;
        let options = match_options(limit, reference_date)?;

        let report = MatchReport::generate(&self.matcher, &request, &donors, &options)?;
        Ok(report.to_json()?)
    }

    /// Search the donor directory; returns matching donor IDs.
    pub fn search_donors(
        &self,
        donors: Vec<FfiDonorRecord>,
        query: FfiDonorQuery,
        reference_date: Option<String>,
    ) -> Result<Vec<u64>, PulseCareError> {
        let donors = convert_donors(donors)?;
        let query = DonorQuery::try_from(query)?;
        let reference_date = parse_date(reference_date.as_deref())?
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        Ok(search_donors(&donors, &query, reference_date)
            .into_iter()
            .map(|d| d.id)
            .collect())
    }

    /// Current scoring policy as JSON.
    pub fn policy_json(&self) -> Result<String, PulseCareError> {
        Ok(self.matcher.policy().to_json()?)
    }
}

fn convert_donors(donors: Vec<FfiDonorRecord>) -> Result<Vec<DonorRecord>, PulseCareError> {
    donors.into_iter().map(DonorRecord::try_from).collect()
}

fn match_options(
    limit: Option<u32>,
    reference_date: Option<String>,
) -> Result<MatchOptions, PulseCareError> {
    Ok(MatchOptions {
        limit: limit.map(|l| l as usize),
        reference_date: parse_date(reference_date.as_deref())?,
    })
}

/// Parse a `YYYY-MM-DD` date.
fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, PulseCareError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| PulseCareError::InvalidInput(format!("bad date {:?}: {}", s, e)))
        })
        .transpose()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe location. Latitude and longitude come as a pair or not at all.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLocation {
    pub district: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TryFrom<FfiLocation> for Location {
    type Error = PulseCareError;

    fn try_from(location: FfiLocation) -> Result<Self, Self::Error> {
        let coordinates = match (location.latitude, location.longitude) {
            (Some(lat), Some(lon)) => {
                let coords = Coordinates::new(lat, lon);
                if !coords.is_valid() {
                    return Err(PulseCareError::InvalidInput(format!(
                        "coordinates out of range: ({}, {})",
                        lat, lon
                    )));
                }
                Some(coords)
            }
            (None, None) => None,
            _ => {
                return Err(PulseCareError::InvalidInput(
                    "latitude and longitude must be given together".into(),
                ))
            }
        };

        Ok(Location {
            district: location.district,
            coordinates,
        })
    }
}

/// FFI-safe donor record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDonorRecord {
    pub id: u64,
    pub blood_group: String,
    pub is_available: bool,
    /// `YYYY-MM-DD`
    pub last_donation_date: Option<String>,
    pub is_verified: bool,
    pub rating: u8,
    pub location: FfiLocation,
}

impl TryFrom<FfiDonorRecord> for DonorRecord {
    type Error = PulseCareError;

    fn try_from(donor: FfiDonorRecord) -> Result<Self, Self::Error> {
        if donor.rating > models::MAX_RATING {
            return Err(PulseCareError::InvalidInput(format!(
                "donor {} rating {} exceeds {}",
                donor.id,
                donor.rating,
                models::MAX_RATING
            )));
        }

        Ok(DonorRecord {
            id: donor.id,
            blood_group: donor.blood_group.parse::<BloodGroup>()?,
            is_available: donor.is_available,
            last_donation_date: parse_date(donor.last_donation_date.as_deref())?,
            is_verified: donor.is_verified,
            rating: donor.rating,
            location: Location::try_from(donor.location)?,
        })
    }
}

/// FFI-safe blood request.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRequest {
    pub required_group: String,
    pub units_required: u32,
    /// low, medium, high or critical
    pub urgency: String,
    pub location: FfiLocation,
}

impl TryFrom<FfiRequest> for RequestDescriptor {
    type Error = PulseCareError;

    fn try_from(request: FfiRequest) -> Result<Self, Self::Error> {
        let location = Location::try_from(request.location)?;
        Ok(RequestDescriptor::from_labels(
            &request.required_group,
            request.units_required,
            &request.urgency,
            location,
        )?)
    }
}

/// FFI-safe ranked match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMatchResult {
    pub donor_id: u64,
    pub blood_group: String,
    pub compatible: bool,
    pub eligible: bool,
    pub exact_match: bool,
    pub distance_km: Option<f64>,
    pub score: f64,
}

impl From<MatchResult> for FfiMatchResult {
    fn from(result: MatchResult) -> Self {
        Self {
            donor_id: result.donor.id,
            blood_group: result.donor.blood_group.to_string(),
            compatible: result.compatible,
            eligible: result.eligible,
            exact_match: result.exact_match,
            distance_km: result.distance_km,
            score: result.score,
        }
    }
}

/// FFI-safe eligibility decision.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEligibility {
    pub eligible: bool,
    /// "unavailable" or "cooldown" when not eligible
    pub reason: Option<String>,
    pub days_until_eligible: Option<u32>,
    pub next_eligible_date: Option<String>,
}

/// FFI-safe directory query.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDonorQuery {
    pub blood_group: Option<String>,
    pub compatible_with: Option<String>,
    pub district: Option<String>,
    pub eligible_only: bool,
    pub verified_only: bool,
}

impl TryFrom<FfiDonorQuery> for DonorQuery {
    type Error = PulseCareError;

    fn try_from(query: FfiDonorQuery) -> Result<Self, Self::Error> {
        Ok(DonorQuery {
            blood_group: query
                .blood_group
                .as_deref()
                .map(str::parse::<BloodGroup>)
                .transpose()?,
            compatible_with: query
                .compatible_with
                .as_deref()
                .map(str::parse::<BloodGroup>)
                .transpose()?,
            district: query.district,
            eligible_only: query.eligible_only,
            verified_only: query.verified_only,
        })
    }
}
