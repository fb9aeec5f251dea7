use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// One of the eight ABO/Rh blood types.
///
/// Parsing is strict: only the exact forms `O+`, `O-`, `A+`, `A-`, `B+`,
/// `B-`, `AB+` and `AB-` are accepted. No trimming or case folding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodType {
    /// O Rh-positive.
    OPositive,
    /// O Rh-negative, the universal donor.
    ONegative,
    /// A Rh-positive.
    APositive,
    /// A Rh-negative.
    ANegative,
    /// B Rh-positive.
    BPositive,
    /// B Rh-negative.
    BNegative,
    /// AB Rh-positive, the universal recipient.
    ABPositive,
    /// AB Rh-negative.
    ABNegative,
}

impl BloodType {
    /// Every blood type, in display order.
    pub const ALL: [Self; 8] = [
        Self::OPositive,
        Self::ONegative,
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::ABPositive,
        Self::ABNegative,
    ];

    /// Returns the canonical textual form, e.g. `"AB-"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::ABPositive => "AB+",
            Self::ABNegative => "AB-",
        }
    }

    /// The blood types a donor of this type may give to.
    ///
    /// The table is total over all eight types and every entry contains the
    /// donor's own type.
    #[must_use]
    pub const fn recipients(self) -> &'static [Self] {
        use BloodType::{
            ABNegative, ABPositive, ANegative, APositive, BNegative, BPositive, ONegative,
            OPositive,
        };

        match self {
            ONegative => &[
                ONegative, OPositive, ANegative, APositive, BNegative, BPositive, ABNegative,
                ABPositive,
            ],
            OPositive => &[OPositive, APositive, BPositive, ABPositive],
            ANegative => &[ANegative, APositive, ABNegative, ABPositive],
            APositive => &[APositive, ABPositive],
            BNegative => &[BNegative, BPositive, ABNegative, ABPositive],
            BPositive => &[BPositive, ABPositive],
            ABNegative => &[ABNegative, ABPositive],
            ABPositive => &[ABPositive],
        }
    }

    /// The blood types whose donors may give to a recipient of this type.
    ///
    /// This is the inverse of [`BloodType::recipients`].
    #[must_use]
    pub fn donors(self) -> BTreeSet<Self> {
        Self::ALL
            .into_iter()
            .filter(|donor| donor.can_donate_to(self))
            .collect()
    }

    /// Whether a donor of this type may give to a recipient of type
    /// `recipient`.
    #[must_use]
    pub fn can_donate_to(self, recipient: Self) -> bool {
        self.recipients().contains(&recipient)
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight blood types.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("Unknown blood type '{0}': expected one of O+, O-, A+, A-, B+, B-, AB+, AB-")]
pub struct UnknownBloodTypeError(String);

impl UnknownBloodTypeError {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl FromStr for BloodType {
    type Err = UnknownBloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|blood_type| blood_type.as_str() == s)
            .ok_or_else(|| UnknownBloodTypeError(s.to_string()))
    }
}

impl TryFrom<&str> for BloodType {
    type Error = UnknownBloodTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for BloodType {
    type Error = UnknownBloodTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodType> for String {
    fn from(value: BloodType) -> Self {
        value.as_str().to_string()
    }
}

/// Returns the set of blood types a donor of `blood_type` may give to.
///
/// # Errors
///
/// Returns [`UnknownBloodTypeError`] if `blood_type` is not exactly one of the
/// eight blood types. Callers are expected to have checked the value with
/// [`is_valid_blood_type`](super::is_valid_blood_type) first.
pub fn compatible_recipients(
    blood_type: &str,
) -> Result<BTreeSet<BloodType>, UnknownBloodTypeError> {
    let donor: BloodType = blood_type.parse()?;
    Ok(donor.recipients().iter().copied().collect())
}

/// Returns the set of donor blood types that may give to a recipient of
/// `blood_type`.
///
/// # Errors
///
/// Returns [`UnknownBloodTypeError`] if `blood_type` is not exactly one of the
/// eight blood types.
pub fn compatible_donors(
    blood_type: &str,
) -> Result<BTreeSet<BloodType>, UnknownBloodTypeError> {
    let recipient: BloodType = blood_type.parse()?;
    Ok(recipient.donors())
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn every_type_can_donate_to_itself() {
        for blood_type in BloodType::ALL {
            let recipients = compatible_recipients(blood_type.as_str()).unwrap();
            assert!(!recipients.is_empty());
            assert!(recipients.contains(&blood_type), "{blood_type}");
        }
    }

    #[test]
    fn universal_donor_and_recipient() {
        assert_eq!(compatible_recipients("O-").unwrap().len(), 8);
        assert_eq!(
            compatible_recipients("AB+").unwrap(),
            BTreeSet::from([BloodType::ABPositive])
        );
        assert_eq!(compatible_donors("AB+").unwrap().len(), 8);
        assert_eq!(
            compatible_donors("O-").unwrap(),
            BTreeSet::from([BloodType::ONegative])
        );
    }

    #[test_case("O+", &["O+", "A+", "B+", "AB+"]; "o positive")]
    #[test_case("A-", &["A-", "A+", "AB-", "AB+"]; "a negative")]
    #[test_case("A+", &["A+", "AB+"]; "a positive")]
    #[test_case("B-", &["B-", "B+", "AB-", "AB+"]; "b negative")]
    #[test_case("B+", &["B+", "AB+"]; "b positive")]
    #[test_case("AB-", &["AB-", "AB+"]; "ab negative")]
    fn recipients_table(donor: &str, expected: &[&str]) {
        let expected: BTreeSet<BloodType> = expected.iter().map(|s| s.parse().unwrap()).collect();
        assert_eq!(compatible_recipients(donor).unwrap(), expected);
    }

    #[test]
    fn donors_are_inverse_of_recipients() {
        for donor in BloodType::ALL {
            for recipient in BloodType::ALL {
                assert_eq!(
                    donor.recipients().contains(&recipient),
                    recipient.donors().contains(&donor),
                    "{donor} -> {recipient}"
                );
            }
        }
    }

    #[test_case("o+"; "lowercase")]
    #[test_case(" O+"; "leading whitespace")]
    #[test_case("O"; "missing rh factor")]
    #[test_case("AB"; "missing rh factor ab")]
    #[test_case(""; "empty")]
    #[test_case("C+"; "unknown group")]
    fn unknown_type_is_rejected(input: &str) {
        let error = compatible_recipients(input).unwrap_err();
        assert_eq!(error.value(), input);
        assert!(compatible_donors(input).is_err());
    }

    #[test]
    fn display_matches_parse() {
        for blood_type in BloodType::ALL {
            assert_eq!(blood_type.to_string().parse::<BloodType>(), Ok(blood_type));
        }
    }

    #[test]
    fn serde_uses_textual_form() {
        let json = serde_json::to_string(&BloodType::ABNegative).unwrap();
        assert_eq!(json, "\"AB-\"");
        let parsed: BloodType = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodType::OPositive);
        assert!(serde_json::from_str::<BloodType>("\"ab-\"").is_err());
    }

    #[test]
    fn error_display() {
        let error = "X".parse::<BloodType>().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unknown blood type 'X': expected one of O+, O-, A+, A-, B+, B-, AB+, AB-"
        );
    }
}
