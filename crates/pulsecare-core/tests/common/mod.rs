//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Once;

use chrono::{Days, NaiveDate};
use env_logger::Builder;
use log::LevelFilter;
use pulsecare_core::models::{BloodGroup, DonorRecord, Location};

static INIT: Once = Once::new();

/// Initialize the logger for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .try_init();
    });
}

/// Fixed reference date so eligibility is reproducible.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn days_ago(days: u64) -> NaiveDate {
    reference_date().checked_sub_days(Days::new(days)).unwrap()
}

pub fn make_donor(id: u64, group: BloodGroup) -> DonorRecord {
    DonorRecord::new(id, group, Location::district("Dhaka"))
}
