//! Donation eligibility by availability and time since last donation.

use chrono::{Days, NaiveDate};
use log::warn;

use crate::models::{DonorRecord, Eligibility};

/// Minimum days between successive donations.
pub const COOLDOWN_DAYS: i64 = 120;

/// Decide whether `donor` may donate on `reference_date`.
///
/// Rules apply in order: the donor must be available; a donor who never
/// donated is eligible; otherwise at least [`COOLDOWN_DAYS`] whole days must
/// separate the last donation from the reference date (inclusive).
pub fn check_eligibility(donor: &DonorRecord, reference_date: NaiveDate) -> Eligibility {
    if !donor.is_available {
        return Eligibility::Unavailable;
    }

    let Some(last_donation) = donor.last_donation_date else {
        return Eligibility::Eligible;
    };

    let days_since = days_since_donation(donor.id, last_donation, reference_date);
    if days_since >= COOLDOWN_DAYS {
        Eligibility::Eligible
    } else {
        Eligibility::Cooldown {
            days_until_eligible: (COOLDOWN_DAYS - days_since) as u32,
        }
    }
}

/// First date the donor may donate again, if a cooldown applies on
/// `reference_date`.
pub fn next_eligible_date(donor: &DonorRecord, reference_date: NaiveDate) -> Option<NaiveDate> {
    let days = check_eligibility(donor, reference_date).days_until_eligible()?;
    reference_date.checked_add_days(Days::new(u64::from(days)))
}

/// Whole days between two calendar dates; a future donation counts as 0.
fn days_since_donation(donor_id: u64, last_donation: NaiveDate, reference_date: NaiveDate) -> i64 {
    let days = reference_date.signed_duration_since(last_donation).num_days();
    if days < 0 {
        warn!(
            "donor {} has last donation date {} after reference date {}",
            donor_id, last_donation, reference_date
        );
        return 0;
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, Location};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn donor_with(last: Option<NaiveDate>, available: bool) -> DonorRecord {
        let mut donor = DonorRecord::new(1, BloodGroup::OPos, Location::district("Dhaka"));
        donor.last_donation_date = last;
        donor.is_available = available;
        donor
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let today = date(2024, 6, 1);

        let at_120 = donor_with(today.checked_sub_days(Days::new(120)), true);
        assert_eq!(check_eligibility(&at_120, today), Eligibility::Eligible);

        let at_119 = donor_with(today.checked_sub_days(Days::new(119)), true);
        assert_eq!(
            check_eligibility(&at_119, today),
            Eligibility::Cooldown { days_until_eligible: 1 }
        );
    }

    #[test]
    fn test_never_donated_is_eligible() {
        let donor = donor_with(None, true);
        assert!(check_eligibility(&donor, date(1990, 1, 1)).is_eligible());
        assert!(check_eligibility(&donor, date(2099, 12, 31)).is_eligible());
    }

    #[test]
    fn test_unavailable_overrides_recency() {
        let donor = donor_with(None, false);
        assert_eq!(check_eligibility(&donor, date(2024, 6, 1)), Eligibility::Unavailable);

        let long_ago = donor_with(Some(date(2000, 1, 1)), false);
        assert_eq!(check_eligibility(&long_ago, date(2024, 6, 1)), Eligibility::Unavailable);
    }

    #[test]
    fn test_donated_today() {
        let today = date(2024, 6, 1);
        let donor = donor_with(Some(today), true);
        assert_eq!(
            check_eligibility(&donor, today),
            Eligibility::Cooldown { days_until_eligible: 120 }
        );
    }

    #[test]
    fn test_future_donation_date_counts_as_zero_days() {
        let today = date(2024, 6, 1);
        let donor = donor_with(Some(date(2024, 9, 1)), true);
        assert_eq!(
            check_eligibility(&donor, today),
            Eligibility::Cooldown { days_until_eligible: 120 }
        );
    }

    #[test]
    fn test_leap_year_span() {
        // 2024-02-29 + 120 days = 2024-06-28
        let donor = donor_with(Some(date(2024, 2, 29)), true);
        assert_eq!(next_eligible_date(&donor, date(2024, 6, 1)), Some(date(2024, 6, 28)));
        assert!(!check_eligibility(&donor, date(2024, 6, 27)).is_eligible());
        assert!(check_eligibility(&donor, date(2024, 6, 28)).is_eligible());
    }

    #[test]
    fn test_next_eligible_date_none_when_never_donated() {
        assert_eq!(next_eligible_date(&donor_with(None, true), date(2024, 6, 1)), None);
    }

    #[test]
    fn test_next_eligible_date_none_when_already_eligible() {
        let donor = donor_with(Some(date(2023, 1, 1)), true);
        assert_eq!(next_eligible_date(&donor, date(2024, 6, 1)), None);
    }

    #[test]
    fn test_next_eligible_date_none_when_unavailable() {
        let donor = donor_with(Some(date(2024, 5, 1)), false);
        assert_eq!(next_eligible_date(&donor, date(2024, 6, 1)), None);
    }

    #[test]
    fn test_next_eligible_date_counts_future_donation_from_reference() {
        let today = date(2024, 6, 1);
        let donor = donor_with(Some(date(2024, 9, 1)), true);

        // Counted from the reference date, matching days_until_eligible
        assert_eq!(check_eligibility(&donor, today).days_until_eligible(), Some(120));
        assert_eq!(next_eligible_date(&donor, today), Some(date(2024, 9, 29)));
    }
}
