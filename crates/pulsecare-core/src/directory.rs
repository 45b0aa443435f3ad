//! Donor directory search by blood group and district.
//!
//! District names are matched typo-tolerantly, so "Chittagong", "chattogram"
//! and "Dhaka " all find what the user meant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::matcher::{check_eligibility, is_compatible};
use crate::models::{BloodGroup, DonorRecord};

/// Minimum Jaro-Winkler similarity for two district names to match.
const DISTRICT_MATCH_THRESHOLD: f64 = 0.88;

/// Filters for the donor directory. Unset filters match everyone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DonorQuery {
    /// Donors of exactly this group
    pub blood_group: Option<BloodGroup>,
    /// Donors who can give to a recipient of this group
    pub compatible_with: Option<BloodGroup>,
    /// District name, fuzzy matched
    pub district: Option<String>,
    /// Only donors eligible at the reference date
    pub eligible_only: bool,
    /// Only verified donors
    pub verified_only: bool,
}

/// Search donors, returning matches sorted by donor id.
pub fn search_donors<'a>(
    donors: &'a [DonorRecord],
    query: &DonorQuery,
    reference_date: NaiveDate,
) -> Vec<&'a DonorRecord> {
    let district = query.district.as_deref().map(normalize_district);

    let mut found: Vec<&DonorRecord> = donors
        .iter()
        .filter(|d| query.blood_group.map_or(true, |g| d.blood_group == g))
        .filter(|d| {
            query
                .compatible_with
                .map_or(true, |recipient| is_compatible(recipient, d.blood_group))
        })
        .filter(|d| !query.verified_only || d.is_verified)
        .filter(|d| match &district {
            Some(wanted) => district_matches(wanted, &normalize_district(&d.location.district)),
            None => true,
        })
        .filter(|d| !query.eligible_only || check_eligibility(d, reference_date).is_eligible())
        .collect();

    found.sort_by_key(|d| d.id);
    found
}

/// Lowercase, collapse whitespace, drop punctuation.
fn normalize_district(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn district_matches(wanted: &str, candidate: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    wanted == candidate || jaro_winkler(wanted, candidate) >= DISTRICT_MATCH_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn pool() -> Vec<DonorRecord> {
        let mut d1 = DonorRecord::new(3, BloodGroup::APos, Location::district("Dhaka"));
        d1.is_verified = true;
        let d2 = DonorRecord::new(1, BloodGroup::ONeg, Location::district("Chittagong"));
        let mut d3 = DonorRecord::new(2, BloodGroup::BPos, Location::district("dhaka"));
        d3.last_donation_date = today().checked_sub_days(Days::new(10));
        let d4 = DonorRecord::new(4, BloodGroup::APos, Location::district("Sylhet"));
        vec![d1, d2, d3, d4]
    }

    fn ids(found: &[&DonorRecord]) -> Vec<u64> {
        found.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_empty_query_returns_all_sorted() {
        let donors = pool();
        let found = search_donors(&donors, &DonorQuery::default(), today());
        assert_eq!(ids(&found), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_exact_group() {
        let donors = pool();
        let query = DonorQuery {
            blood_group: Some(BloodGroup::APos),
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &query, today())), vec![3, 4]);
    }

    #[test]
    fn test_compatible_with() {
        let donors = pool();
        let query = DonorQuery {
            compatible_with: Some(BloodGroup::APos),
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &query, today())), vec![1, 3, 4]);
    }

    #[test]
    fn test_district_is_case_and_typo_tolerant() {
        let donors = pool();
        let query = DonorQuery {
            district: Some("  DHAKA ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &query, today())), vec![2, 3]);

        let typo = DonorQuery {
            district: Some("Chitagong".into()),
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &typo, today())), vec![1]);

        let other = DonorQuery {
            district: Some("Khulna".into()),
            ..Default::default()
        };
        assert!(search_donors(&donors, &other, today()).is_empty());
    }

    #[test]
    fn test_eligible_and_verified_only() {
        let donors = pool();
        let eligible = DonorQuery {
            eligible_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &eligible, today())), vec![1, 3, 4]);

        let verified = DonorQuery {
            verified_only: true,
            ..Default::default()
        };
        assert_eq!(ids(&search_donors(&donors, &verified, today())), vec![3]);
    }

    #[test]
    fn test_normalize_district() {
        assert_eq!(normalize_district("  Cox's   Bazar "), "coxs bazar");
        assert_eq!(normalize_district(""), "");
    }
}
