//! Export of matching runs for alert broadcast and audit.

mod report;

pub use report::*;
