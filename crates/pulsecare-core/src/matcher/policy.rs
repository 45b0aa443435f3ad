//! Scoring weights per urgency level.
//!
//! Default weights:
//!
//! | urgency  | exact | verified | rating | proximity |
//! |----------|-------|----------|--------|-----------|
//! | low      | 0.35  | 0.20     | 0.30   | 0.15      |
//! | medium   | 0.35  | 0.15     | 0.25   | 0.25      |
//! | high     | 0.35  | 0.10     | 0.20   | 0.35      |
//! | critical | 0.35  | 0.05     | 0.10   | 0.50      |

use serde::{Deserialize, Serialize};

use super::{EngineResult, MatchError};
use crate::models::Urgency;

/// Distance at which the proximity factor drops to one half.
pub const DEFAULT_PROXIMITY_SCALE_KM: f64 = 10.0;

/// Weight of each score factor for one urgency level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UrgencyWeights {
    pub exact_match: f64,
    pub verification: f64,
    pub rating: f64,
    pub proximity: f64,
}

impl UrgencyWeights {
    const fn new(exact_match: f64, verification: f64, rating: f64, proximity: f64) -> Self {
        Self {
            exact_match,
            verification,
            rating,
            proximity,
        }
    }

    fn validate(&self, urgency: Urgency) -> EngineResult<()> {
        let all = [self.exact_match, self.verification, self.rating, self.proximity];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MatchError::InvalidRequest(format!(
                "{} weights must be finite and non-negative",
                urgency
            )));
        }
        if self.exact_match <= 0.0 {
            return Err(MatchError::InvalidRequest(format!(
                "{} exact_match weight must be positive",
                urgency
            )));
        }
        Ok(())
    }
}

/// Scoring configuration used by the matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringPolicy {
    pub low: UrgencyWeights,
    pub medium: UrgencyWeights,
    pub high: UrgencyWeights,
    pub critical: UrgencyWeights,
    pub proximity_scale_km: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            low: UrgencyWeights::new(0.35, 0.20, 0.30, 0.15),
            medium: UrgencyWeights::new(0.35, 0.15, 0.25, 0.25),
            high: UrgencyWeights::new(0.35, 0.10, 0.20, 0.35),
            critical: UrgencyWeights::new(0.35, 0.05, 0.10, 0.50),
            proximity_scale_km: DEFAULT_PROXIMITY_SCALE_KM,
        }
    }
}

impl ScoringPolicy {
    /// Load a policy from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let policy: ScoringPolicy = serde_json::from_str(json)
            .map_err(|e| MatchError::InvalidRequest(format!("scoring policy: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Weights for one urgency level.
    pub fn weights_for(&self, urgency: Urgency) -> &UrgencyWeights {
        match urgency {
            Urgency::Low => &self.low,
            Urgency::Medium => &self.medium,
            Urgency::High => &self.high,
            Urgency::Critical => &self.critical,
        }
    }

    /// Reject weights that would break ranking guarantees.
    pub fn validate(&self) -> EngineResult<()> {
        for urgency in [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical] {
            self.weights_for(urgency).validate(urgency)?;
        }
        if !self.proximity_scale_km.is_finite() || self.proximity_scale_km <= 0.0 {
            return Err(MatchError::InvalidRequest(
                "proximity_scale_km must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(ScoringPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let policy = ScoringPolicy::default();
        for urgency in [Urgency::Low, Urgency::Medium, Urgency::High, Urgency::Critical] {
            let w = policy.weights_for(urgency);
            let sum = w.exact_match + w.verification + w.rating + w.proximity;
            assert!((sum - 1.0).abs() < 1e-9, "{} sums to {}", urgency, sum);
        }
    }

    #[test]
    fn test_urgency_shifts_weight_to_proximity() {
        let policy = ScoringPolicy::default();
        let critical = policy.weights_for(Urgency::Critical);
        let low = policy.weights_for(Urgency::Low);

        assert!(critical.proximity > critical.rating + critical.verification);
        assert!(low.rating + low.verification > low.proximity);
        assert!(critical.proximity > low.proximity);
    }

    #[test]
    fn test_from_json_partial_override() {
        let json = r#"{"proximity_scale_km": 25.0}"#;
        let policy = ScoringPolicy::from_json(json).unwrap();
        assert_eq!(policy.proximity_scale_km, 25.0);
        assert_eq!(policy.critical, ScoringPolicy::default().critical);
    }

    #[test]
    fn test_from_json_round_trip() {
        let policy = ScoringPolicy::default();
        let json = policy.to_json().unwrap();
        assert_eq!(ScoringPolicy::from_json(&json).unwrap(), policy);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let zero_exact = r#"{"high": {
            "exact_match": 0.0, "verification": 0.1, "rating": 0.2, "proximity": 0.7
        }}"#;
        assert!(matches!(
            ScoringPolicy::from_json(zero_exact),
            Err(MatchError::InvalidRequest(_))
        ));

        let negative = r#"{"low": {
            "exact_match": 0.3, "verification": -0.1, "rating": 0.2, "proximity": 0.6
        }}"#;
        assert!(ScoringPolicy::from_json(negative).is_err());

        assert!(ScoringPolicy::from_json(r#"{"proximity_scale_km": 0}"#).is_err());
        assert!(ScoringPolicy::from_json("not json").is_err());
    }
}
