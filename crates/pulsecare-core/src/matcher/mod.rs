//! Donor matching engine.
//!
//! Pipeline: Compatibility → Eligibility → Scoring → Ranking → Limit

mod compatibility;
mod eligibility;
mod policy;
mod scoring;

pub use compatibility::*;
pub use eligibility::*;
pub use policy::*;
pub use scoring::*;

use chrono::{NaiveDate, Utc};
use log::{debug, trace};
use thiserror::Error;

use crate::models::{DonorRecord, Eligibility, MatchResult, RequestDescriptor, ScoreBreakdown};

/// Matching errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid blood group: {0:?}")]
    InvalidBloodGroup(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type EngineResult<T> = Result<T, MatchError>;

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOptions {
    /// Cap on returned candidates
    pub limit: Option<usize>,
    /// Date eligibility is judged at; today (UTC) when absent
    pub reference_date: Option<NaiveDate>,
}

impl MatchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn at(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    pub(crate) fn resolve_reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Matcher holding the scoring policy. Stateless otherwise; safe to share.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    policy: ScoringPolicy,
}

impl Matcher {
    /// Create a matcher with a validated policy.
    pub fn new(policy: ScoringPolicy) -> EngineResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Get the scoring policy.
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Rank compatible, eligible donors for a request.
    pub fn match_donors(
        &self,
        request: &RequestDescriptor,
        donors: &[DonorRecord],
        options: &MatchOptions,
    ) -> EngineResult<Vec<MatchResult>> {
        request.validate()?;
        let reference_date = options.resolve_reference_date();

        // Step 1: Compatibility (cheaper check first)
        let compatible: Vec<&DonorRecord> = donors
            .iter()
            .filter(|donor| {
                let ok = is_compatible(request.required_group, donor.blood_group);
                if !ok {
                    trace!("donor {} excluded: incompatible {}", donor.id, donor.blood_group);
                }
                ok
            })
            .collect();

        // Step 2: Eligibility, Step 3: Scoring
        let mut ranked: Vec<MatchResult> = compatible
            .iter()
            .filter_map(|donor| {
                let eligibility = check_eligibility(donor, reference_date);
                if !eligibility.is_eligible() {
                    trace!(
                        "donor {} excluded: {}",
                        donor.id,
                        eligibility.reason().unwrap_or("ineligible")
                    );
                    return None;
                }
                Some(self.build_result(request, donor, true, eligibility))
            })
            .collect();

        // Step 4: Ranking
        rank(&mut ranked);

        debug!(
            "matched {} request: pool={} compatible={} eligible={} limit={:?}",
            request.required_group,
            donors.len(),
            compatible.len(),
            ranked.len(),
            options.limit
        );

        // Step 5: Limit
        if let Some(limit) = options.limit {
            ranked.truncate(limit);
        }

        Ok(ranked)
    }

    /// Evaluate every donor, in input order, including excluded ones.
    ///
    /// `score` is 0.0 for donors that are not both compatible and eligible.
    pub fn evaluate(
        &self,
        request: &RequestDescriptor,
        donors: &[DonorRecord],
        reference_date: NaiveDate,
    ) -> EngineResult<Vec<MatchResult>> {
        request.validate()?;
        Ok(donors
            .iter()
            .map(|donor| self.evaluate_donor(request, donor, reference_date))
            .collect())
    }

    /// Evaluate one donor against a request.
    pub fn evaluate_donor(
        &self,
        request: &RequestDescriptor,
        donor: &DonorRecord,
        reference_date: NaiveDate,
    ) -> MatchResult {
        let compatible = is_compatible(request.required_group, donor.blood_group);
        let eligibility = check_eligibility(donor, reference_date);
        self.build_result(request, donor, compatible, eligibility)
    }

    fn build_result(
        &self,
        request: &RequestDescriptor,
        donor: &DonorRecord,
        compatible: bool,
        eligibility: Eligibility,
    ) -> MatchResult {
        let eligible = eligibility.is_eligible();
        let distance_km = donor_distance_km(request, donor);
        let (score, score_breakdown) = if compatible && eligible {
            let breakdown =
                score_breakdown(request, donor, distance_km, self.policy.proximity_scale_km);
            let weights = self.policy.weights_for(request.urgency);
            (breakdown.weighted_score(weights), breakdown)
        } else {
            (0.0, ScoreBreakdown::default())
        };

        MatchResult {
            donor: donor.clone(),
            compatible,
            eligible,
            eligibility,
            exact_match: donor.blood_group == request.required_group,
            distance_km,
            score,
            score_breakdown,
        }
    }
}

/// Rank donors for a request using the default scoring policy.
pub fn match_donors(
    request: &RequestDescriptor,
    donors: &[DonorRecord],
    options: &MatchOptions,
) -> EngineResult<Vec<MatchResult>> {
    Matcher::default().match_donors(request, donors, options)
}
