//! Blood-type compatibility table.
//!
//! Maps a recipient's blood type to the donor types that may transfuse into it
//! under the ABO/Rh rules.

pub use bloodlink_db::entities::{BloodType, ParseBloodTypeError};

use bloodlink_db::entities::BloodType::{
    ANegative, APositive, AbNegative, AbPositive, BNegative, BPositive, ONegative, OPositive,
};

/// Donor types whose blood a recipient of `recipient` type can receive.
///
/// Ordered with the recipient's own type first and O- last.
#[must_use]
pub const fn compatible_donor_types(recipient: BloodType) -> &'static [BloodType] {
    match recipient {
        APositive => &[APositive, ANegative, OPositive, ONegative],
        ANegative => &[ANegative, ONegative],
        BPositive => &[BPositive, BNegative, OPositive, ONegative],
        BNegative => &[BNegative, ONegative],
        AbPositive => &[
            AbPositive, AbNegative, APositive, ANegative, BPositive, BNegative, OPositive,
            ONegative,
        ],
        AbNegative => &[AbNegative, ANegative, BNegative, ONegative],
        OPositive => &[OPositive, ONegative],
        ONegative => &[ONegative],
    }
}

/// Returns whether a `donor` may give blood to a `recipient`.
#[must_use]
pub fn can_donate_to(donor: BloodType, recipient: BloodType) -> bool {
    compatible_donor_types(recipient).contains(&donor)
}

/// Recipient types a `donor` can give blood to.
#[must_use]
pub fn compatible_recipient_types(donor: BloodType) -> Vec<BloodType> {
    BloodType::ALL
        .into_iter()
        .filter(|&recipient| can_donate_to(donor, recipient))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (has A antigen, has B antigen, has `RhD`)
    const fn antigens(t: BloodType) -> (bool, bool, bool) {
        match t {
            APositive => (true, false, true),
            ANegative => (true, false, false),
            BPositive => (false, true, true),
            BNegative => (false, true, false),
            AbPositive => (true, true, true),
            AbNegative => (true, true, false),
            OPositive => (false, false, true),
            ONegative => (false, false, false),
        }
    }

    #[test]
    fn test_table_matches_antigen_rule() {
        // donor antigens must be a subset of the recipient's
        for recipient in BloodType::ALL {
            let (ra, rb, rd) = antigens(recipient);
            for donor in BloodType::ALL {
                let (da, db, dd) = antigens(donor);
                let legal = (!da || ra) && (!db || rb) && (!dd || rd);
                assert_eq!(
                    can_donate_to(donor, recipient),
                    legal,
                    "{donor} -> {recipient}"
                );
            }
        }
    }

    #[test]
    fn test_o_negative_is_universal_donor() {
        for recipient in BloodType::ALL {
            assert!(compatible_donor_types(recipient).contains(&ONegative));
        }
        assert_eq!(compatible_recipient_types(ONegative), BloodType::ALL.to_vec());
    }

    #[test]
    fn test_ab_positive_is_universal_recipient() {
        let donors = compatible_donor_types(AbPositive);
        assert_eq!(donors.len(), 8);
        for t in BloodType::ALL {
            assert!(donors.contains(&t));
        }
    }

    #[test]
    fn test_explicit_rows() {
        assert_eq!(
            compatible_donor_types(APositive),
            &[APositive, ANegative, OPositive, ONegative]
        );
        assert_eq!(
            compatible_donor_types(AbNegative),
            &[AbNegative, ANegative, BNegative, ONegative]
        );
        assert_eq!(compatible_donor_types(ONegative), &[ONegative]);
        assert!(!can_donate_to(OPositive, ONegative));
        assert!(!can_donate_to(APositive, BPositive));
    }

    #[test]
    fn test_no_duplicates_and_self_first() {
        for recipient in BloodType::ALL {
            let donors = compatible_donor_types(recipient);
            assert_eq!(donors[0], recipient);
            let mut sorted = donors.to_vec();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), donors.len());
        }
    }
}
