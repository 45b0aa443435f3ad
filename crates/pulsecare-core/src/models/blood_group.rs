//! ABO/Rh blood groups and the red-cell transfusion table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::matcher::MatchError;

/// One of the eight ABO/Rh blood groups.
///
/// Serialized as its label (`"AB+"`); deserialization accepts the same
/// spellings as [`FromStr`] and fails with `InvalidBloodGroup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodGroup {
    ONeg,
    OPos,
    ANeg,
    APos,
    BNeg,
    BPos,
    AbNeg,
    AbPos,
}

use BloodGroup::*;

impl BloodGroup {
    /// All groups, universal donor first.
    pub const ALL: [BloodGroup; 8] = [ONeg, OPos, ANeg, APos, BNeg, BPos, AbNeg, AbPos];

    /// Recipient groups this donor group can serve.
    pub fn recipients(self) -> &'static [BloodGroup] {
        match self {
            ONeg => &[ONeg, OPos, ANeg, APos, BNeg, BPos, AbNeg, AbPos],
            OPos => &[OPos, APos, BPos, AbPos],
            ANeg => &[ANeg, APos, AbNeg, AbPos],
            APos => &[APos, AbPos],
            BNeg => &[BNeg, BPos, AbNeg, AbPos],
            BPos => &[BPos, AbPos],
            AbNeg => &[AbNeg, AbPos],
            AbPos => &[AbPos],
        }
    }

    /// Whether a donor of this group can give to `recipient`.
    pub fn can_donate_to(self, recipient: BloodGroup) -> bool {
        self.recipients().contains(&recipient)
    }

    /// Donor groups that can serve a recipient of this group, in `ALL` order.
    pub fn compatible_donors(self) -> Vec<BloodGroup> {
        Self::ALL
            .iter()
            .copied()
            .filter(|donor| donor.can_donate_to(self))
            .collect()
    }

    pub fn is_universal_donor(self) -> bool {
        self == ONeg
    }

    pub fn is_universal_recipient(self) -> bool {
        self == AbPos
    }

    /// Canonical label, e.g. `"AB+"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ONeg => "O-",
            OPos => "O+",
            ANeg => "A-",
            APos => "A+",
            BNeg => "B-",
            BPos => "B+",
            AbNeg => "AB-",
            AbPos => "AB+",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = MatchError;

    /// Parse a group label. Case and surrounding whitespace are ignored and
    /// the Unicode minus sign is read as `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s.trim().replace('\u{2212}', "-").to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == canonical)
            .ok_or_else(|| MatchError::InvalidBloodGroup(s.to_string()))
    }
}

impl TryFrom<&str> for BloodGroup {
    type Error = MatchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for BloodGroup {
    type Error = MatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodGroup> for String {
    fn from(group: BloodGroup) -> Self {
        group.as_str().to_string()
    }
}
