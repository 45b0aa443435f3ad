//! Red-cell compatibility between donor and recipient groups.

use crate::models::BloodGroup;

use super::EngineResult;

/// Whether a donor of `donor_group` can supply a request for `required_group`.
pub fn is_compatible(required_group: BloodGroup, donor_group: BloodGroup) -> bool {
    donor_group.can_donate_to(required_group)
}

/// Same as [`is_compatible`] for unparsed labels.
///
/// Unknown labels fail with `InvalidBloodGroup` instead of reading as
/// incompatible.
pub fn is_compatible_labels(required_group: &str, donor_group: &str) -> EngineResult<bool> {
    let required: BloodGroup = required_group.parse()?;
    let donor: BloodGroup = donor_group.parse()?;
    Ok(is_compatible(required, donor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchError;
    use crate::models::BloodGroup::*;

    #[test]
    fn test_universal_donor() {
        for required in BloodGroup::ALL {
            assert!(is_compatible(required, ONeg));
        }
    }

    #[test]
    fn test_universal_recipient() {
        for donor in BloodGroup::ALL {
            assert!(is_compatible(AbPos, donor));
        }
    }

    #[test]
    fn test_ab_pos_only_gives_to_ab_pos() {
        let served: Vec<_> = BloodGroup::ALL
            .into_iter()
            .filter(|required| is_compatible(*required, AbPos))
            .collect();
        assert_eq!(served, vec![AbPos]);
    }

    #[test]
    fn test_rh_negative_recipient_refuses_rh_positive() {
        assert!(!is_compatible(ANeg, APos));
        assert!(!is_compatible(ONeg, OPos));
        assert!(is_compatible(APos, ANeg));
    }

    #[test]
    fn test_labels() {
        assert!(is_compatible_labels("A+", "O-").unwrap());
        assert!(!is_compatible_labels("A+", "B+").unwrap());
        assert!(matches!(
            is_compatible_labels("X+", "O-"),
            Err(MatchError::InvalidBloodGroup(_))
        ));
        assert!(matches!(
            is_compatible_labels("A+", "Q"),
            Err(MatchError::InvalidBloodGroup(_))
        ));
    }
}
