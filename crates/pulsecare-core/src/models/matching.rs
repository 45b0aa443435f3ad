//! Match output models.

use serde::{Deserialize, Serialize};

use super::DonorRecord;
use crate::matcher::UrgencyWeights;

/// Whether a donor may donate right now, and if not, why.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    /// Available and outside the cooldown window
    Eligible,
    /// Donor has not opted in
    Unavailable,
    /// Donated too recently
    Cooldown { days_until_eligible: u32 },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// Days left in the cooldown window, if that is what blocks the donor.
    pub fn days_until_eligible(&self) -> Option<u32> {
        match self {
            Eligibility::Cooldown { days_until_eligible } => Some(*days_until_eligible),
            Eligibility::Eligible | Eligibility::Unavailable => None,
        }
    }

    /// Short reason code, `None` when eligible.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Unavailable => Some("unavailable"),
            Eligibility::Cooldown { .. } => Some("cooldown"),
        }
    }
}

/// Per-factor scores, each in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreBreakdown {
    /// 1.0 when donor group equals the requested group
    pub exact_match: f64,
    /// 1.0 when the donor is verified
    pub verification: f64,
    /// Rating over the 0-50 scale
    pub rating: f64,
    /// Distance decay, 0.0 when distance is unknown
    pub proximity: f64,
}

impl ScoreBreakdown {
    /// Combine the factors with the weights for one urgency level.
    pub fn weighted_score(&self, weights: &UrgencyWeights) -> f64 {
        self.exact_match * weights.exact_match
            + self.verification * weights.verification
            + self.rating * weights.rating
            + self.proximity * weights.proximity
    }
}

/// Outcome for one donor against one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    /// The donor as supplied
    pub donor: DonorRecord,
    /// Donor group can serve the requested group
    pub compatible: bool,
    /// Donor may donate at the reference date
    pub eligible: bool,
    /// Eligibility detail
    pub eligibility: Eligibility,
    /// Donor group equals the requested group
    pub exact_match: bool,
    /// Great-circle distance, `None` if either side lacks coordinates
    pub distance_km: Option<f64>,
    /// Composite ranking value; 0.0 unless compatible and eligible
    pub score: f64,
    /// Factors behind `score`
    pub score_breakdown: ScoreBreakdown,
}

impl MatchResult {
    /// Donor appears in ranked output.
    pub fn is_candidate(&self) -> bool {
        self.compatible && self.eligible
    }
}
