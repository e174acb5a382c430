//! Input validation and normalization rules.
//!
//! Pure functions with no dependencies on storage. Every service operation runs
//! its input through these before touching persistence.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DomainError, DomainResult};
use crate::role::Role;

/// Plate letters: Latin letters with a Cyrillic lookalike, and those Cyrillic letters.
const PLATE_LETTERS: &str = "ABEKMHOPCTYXАВЕКМНОРСТУХ";

static PLATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[{l}][0-9]{{3}}[{l}]{{2}}[0-9]{{2,3}}$",
        l = PLATE_LETTERS
    ))
    .expect("plate pattern is a valid regex")
});

/// Trim and uppercase a plate number.
pub fn normalize_plate(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Validate a plate number, returning its normalized form.
pub fn validate_plate(input: &str) -> DomainResult<String> {
    let plate = normalize_plate(input);
    if PLATE_PATTERN.is_match(&plate) {
        Ok(plate)
    } else {
        Err(DomainError::InvalidPlate)
    }
}

/// Parse a role name into the closed role set.
pub fn validate_role(role: &str) -> DomainResult<Role> {
    role.parse()
}

/// Reject ranges where `from` is strictly after `to`.
pub fn validate_date_range(from: DateTime<Utc>, to: DateTime<Utc>) -> DomainResult<()> {
    if from > to {
        return Err(DomainError::InvalidRange);
    }
    Ok(())
}

/// Trim a required string, rejecting it when nothing is left.
pub fn require_non_empty(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional string; blank values become `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Enforce the resident plot invariant and return the normalized plot.
pub fn validate_plot(role: Role, plot_number: Option<String>) -> DomainResult<Option<String>> {
    let plot = normalize_optional(plot_number);
    if role.requires_plot() && plot.is_none() {
        return Err(DomainError::invalid("plot_number is required for residents"));
    }
    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn test_valid_plates() {
        for plate in ["A123BC77", "a123bc777", " X999XX01 ", "А123ВС77", "м001ор199", "E555KM50"] {
            assert!(validate_plate(plate).is_ok(), "expected {plate:?} to be valid");
        }
    }

    #[test]
    fn test_validate_returns_normalized_plate() {
        assert_eq!(validate_plate("  a123bc77 ").unwrap(), "A123BC77");
    }

    #[test]
    fn test_invalid_plates() {
        for plate in [
            "",
            "   ",
            "123ABC77",
            "AA23BC77",
            "A12BC77",
            "A1234BC77",
            "A123B77",
            "A123BC7",
            "A123BC7777",
            "D123BC77",
            "A123BZ77",
            "A123 BC77",
            "A１２３BC77",
        ] {
            assert_eq!(
                validate_plate(plate),
                Err(DomainError::InvalidPlate),
                "expected {plate:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_validate_role() {
        assert_eq!(validate_role("admin").unwrap(), Role::Admin);
        assert_eq!(validate_role("guard").unwrap(), Role::Guard);
        assert_eq!(validate_role("resident").unwrap(), Role::Resident);
        assert!(matches!(validate_role("owner"), Err(DomainError::InvalidRole(_))));
    }

    #[test]
    fn test_date_range_equal_bounds_accepted() {
        let now = Utc::now();
        assert!(validate_date_range(now, now).is_ok());
        assert!(validate_date_range(now, now + Duration::hours(1)).is_ok());
        assert_eq!(
            validate_date_range(now + Duration::seconds(1), now),
            Err(DomainError::InvalidRange)
        );
    }

    #[test]
    fn test_required_and_optional_strings() {
        assert_eq!(require_non_empty("email", "  a@b.c ").unwrap(), "a@b.c");
        assert!(require_non_empty("email", " \t ").is_err());

        assert_eq!(normalize_optional(Some("  Toyota ".into())), Some("Toyota".into()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_resident_requires_plot() {
        assert!(validate_plot(Role::Resident, Some("  ".into())).is_err());
        assert!(validate_plot(Role::Resident, None).is_err());
        assert_eq!(
            validate_plot(Role::Resident, Some(" 12A ".into())).unwrap(),
            Some("12A".into())
        );
        assert_eq!(validate_plot(Role::Guard, None).unwrap(), None);
    }

    fn plate_like() -> impl Strategy<Value = String> {
        "[ abekmhopctyxABEKMHOPCTYXавекмнорстухАВЕКМНОРСТУХ0-9]{0,12}"
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(input in plate_like()) {
            let once = normalize_plate(&input);
            prop_assert_eq!(normalize_plate(&once), once);
        }

        #[test]
        fn normalize_ignores_case(input in plate_like()) {
            prop_assert_eq!(
                normalize_plate(&input.to_lowercase()),
                normalize_plate(&input.to_uppercase())
            );
        }

        #[test]
        fn generated_plates_validate(
            first in prop::sample::select(PLATE_LETTERS.chars().collect::<Vec<_>>()),
            digits in 0u32..1000,
            pair in prop::collection::vec(prop::sample::select(PLATE_LETTERS.chars().collect::<Vec<_>>()), 2),
            region in prop_oneof![10u32..100, 100u32..1000],
        ) {
            let plate = format!("{first}{digits:03}{}{}{region}", pair[0], pair[1]);
            prop_assert!(validate_plate(&plate).is_ok());
            prop_assert!(validate_plate(&plate.to_lowercase()).is_ok());
        }
    }
}
