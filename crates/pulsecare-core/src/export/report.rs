//! Match report for emergency alert broadcast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matcher::{rank, EngineResult, MatchOptions, Matcher};
use crate::models::{DonorRecord, Eligibility, MatchResult, RequestDescriptor};

/// Current report format version.
pub const REPORT_FORMAT_VERSION: &str = "1.0";

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Unique report ID (UUID v4)
    pub report_id: String,
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Date eligibility was judged at
    pub reference_date: NaiveDate,
    /// Report format version
    pub format_version: String,
}

/// Why donors in the pool were left out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExclusionCounts {
    /// Blood group cannot serve the request
    pub incompatible: usize,
    /// Compatible but not opted in
    pub unavailable: usize,
    /// Compatible but inside the cooldown window
    pub cooldown: usize,
}

/// Summary of one matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// The request that was matched
    pub request: RequestDescriptor,
    /// Donors considered
    pub pool_size: usize,
    /// Exclusions by reason
    pub excluded: ExclusionCounts,
    /// Compatible and eligible donors before the limit was applied
    pub candidate_count: usize,
    /// Units still uncovered if every candidate donated one unit
    pub shortfall: u32,
    /// Ranked candidates, capped by the limit
    pub candidates: Vec<MatchResult>,
}

impl MatchReport {
    /// Run the matcher and summarise the outcome.
    pub fn generate(
        matcher: &Matcher,
        request: &RequestDescriptor,
        donors: &[DonorRecord],
        options: &MatchOptions,
    ) -> EngineResult<Self> {
        let reference_date = options.resolve_reference_date();
        let evaluated = matcher.evaluate(request, donors, reference_date)?;

        let mut excluded = ExclusionCounts::default();
        let mut candidates = Vec::new();
        for result in evaluated {
            if !result.compatible {
                excluded.incompatible += 1;
                continue;
            }
            match result.eligibility {
                Eligibility::Eligible => candidates.push(result),
                Eligibility::Unavailable => excluded.unavailable += 1,
                Eligibility::Cooldown { .. } => excluded.cooldown += 1,
            }
        }

        rank(&mut candidates);
        let candidate_count = candidates.len();
        if let Some(limit) = options.limit {
            candidates.truncate(limit);
        }

        let covered = u32::try_from(candidate_count).unwrap_or(u32::MAX);

        Ok(Self {
            metadata: ReportMetadata {
                report_id: uuid::Uuid::new_v4().to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                reference_date,
                format_version: REPORT_FORMAT_VERSION.to_string(),
            },
            request: request.clone(),
            pool_size: donors.len(),
            excluded,
            candidate_count,
            shortfall: request.units_required.saturating_sub(covered),
            candidates,
        })
    }

    /// Enough candidates to cover every requested unit.
    pub fn is_covered(&self) -> bool {
        self.shortfall == 0
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format, one row per ranked candidate.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("report_id,rank,donor_id,blood_group,exact_match,verified,rating,");
        csv.push_str("district,distance_km,score\n");

        for (i, result) in self.candidates.iter().enumerate() {
            let donor = &result.donor;
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{:.4}\n",
                escape_csv(&self.metadata.report_id),
                i + 1,
                donor.id,
                donor.blood_group,
                result.exact_match,
                donor.is_verified,
                donor.rating,
                escape_csv(&donor.location.district),
                result
                    .distance_km
                    .map(|d| format!("{:.2}", d))
                    .unwrap_or_default(),
                result.score,
            ));
        }

        csv
    }
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
