//! Blood request models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BloodGroup, Location};
use crate::matcher::{EngineResult, MatchError};

/// How quickly the blood is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Urgency::Low),
            "medium" => Ok(Urgency::Medium),
            "high" => Ok(Urgency::High),
            "critical" => Ok(Urgency::Critical),
            _ => Err(MatchError::InvalidRequest(format!("unknown urgency: {}", s))),
        }
    }
}

/// An incoming blood need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestDescriptor {
    /// Recipient blood group
    pub required_group: BloodGroup,
    /// Units needed (at least 1)
    pub units_required: u32,
    /// Urgency level
    pub urgency: Urgency,
    /// Where the blood is needed
    pub location: Location,
}

impl RequestDescriptor {
    /// Create a validated request.
    pub fn new(
        required_group: BloodGroup,
        units_required: u32,
        urgency: Urgency,
        location: Location,
    ) -> EngineResult<Self> {
        let request = Self {
            required_group,
            units_required,
            urgency,
            location,
        };
        request.validate()?;
        Ok(request)
    }

    /// Create a request from the text labels an API payload carries.
    pub fn from_labels(
        required_group: &str,
        units_required: u32,
        urgency: &str,
        location: Location,
    ) -> EngineResult<Self> {
        Self::new(
            required_group.parse()?,
            units_required,
            urgency.parse()?,
            location,
        )
    }

    /// Check the request shape.
    pub fn validate(&self) -> EngineResult<()> {
        if self.units_required < 1 {
            return Err(MatchError::InvalidRequest(
                "units_required must be at least 1".into(),
            ));
        }
        if let Some(coords) = &self.location.coordinates {
            if !coords.is_valid() {
                return Err(MatchError::InvalidRequest(format!(
                    "request coordinates out of range: ({}, {})",
                    coords.lat, coords.lon
                )));
            }
        }
        Ok(())
    }
}
