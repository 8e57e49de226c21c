//! Submission validation for the patient form.
//!
//! Checks run in field order and stop at the first violation, so the form
//! surfaces exactly one message per attempt.

use super::draft::PatientDraft;

/// A validation failure; the display string is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("name required")]
    NameRequired,

    #[error("mobile must be exactly 10 digits")]
    InvalidMobile,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("fee must be a non-negative number")]
    InvalidFee,
}

pub type FormResult<T> = Result<T, FormError>;

/// Validate a patient draft for submission. Field order: name, mobile,
/// email, first-visit fee. No partial submission happens on failure.
pub fn validate(draft: &PatientDraft) -> FormResult<()> {
    if draft.name.trim().is_empty() {
        return Err(FormError::NameRequired);
    }
    if !is_valid_mobile(&draft.mobile) {
        return Err(FormError::InvalidMobile);
    }
    let email = draft.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        return Err(FormError::InvalidEmail);
    }
    parse_fee(&draft.first_visit.fee)?;
    Ok(())
}

/// Exactly ten ASCII digits, nothing else.
pub fn is_valid_mobile(mobile: &str) -> bool {
    mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit())
}

/// Basic `local@domain.tld` shape: a non-empty local part, a single `@`,
/// and a domain with a non-empty name and suffix around the last dot.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, suffix)) => !name.is_empty() && !suffix.is_empty(),
        None => false,
    }
}

/// Parse a fee field: empty is fine (no fee), anything else must be a
/// finite non-negative number.
pub fn parse_fee(fee: &str) -> FormResult<Option<f64>> {
    let trimmed = fee.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(FormError::InvalidFee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_draft() -> PatientDraft {
        let mut draft = PatientDraft::default();
        draft.name = "Asha".into();
        draft.mobile = "9876543210".into();
        draft
    }

    #[test]
    fn test_name_required() {
        let mut draft = valid_draft();
        draft.name = "   ".into();
        assert_eq!(validate(&draft), Err(FormError::NameRequired));
    }

    #[test]
    fn test_mobile_lengths() {
        assert!(!is_valid_mobile("12345"));
        assert!(is_valid_mobile("1234567890"));
        assert!(!is_valid_mobile("12345678901"));
        assert!(!is_valid_mobile(""));
        assert!(!is_valid_mobile("12345abcde"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_empty_email_is_optional() {
        let mut draft = valid_draft();
        draft.email = "".into();
        assert_eq!(validate(&draft), Ok(()));

        draft.email = "  ".into();
        assert_eq!(validate(&draft), Ok(()));
    }

    #[test]
    fn test_fee_values() {
        assert_eq!(parse_fee("-5"), Err(FormError::InvalidFee));
        assert_eq!(parse_fee("0"), Ok(Some(0.0)));
        assert_eq!(parse_fee(""), Ok(None));
        assert_eq!(parse_fee("20.50"), Ok(Some(20.5)));
        assert_eq!(parse_fee("abc"), Err(FormError::InvalidFee));
        assert_eq!(parse_fee("NaN"), Err(FormError::InvalidFee));
        assert_eq!(parse_fee("inf"), Err(FormError::InvalidFee));
    }

    #[test]
    fn test_first_violation_wins() {
        let mut draft = PatientDraft::default();
        draft.mobile = "123".into();
        draft.email = "broken".into();
        draft.first_visit.fee = "-1".into();

        // Everything is wrong; the name check fires first.
        assert_eq!(validate(&draft), Err(FormError::NameRequired));

        draft.name = "Asha".into();
        assert_eq!(validate(&draft), Err(FormError::InvalidMobile));

        draft.mobile = "9876543210".into();
        assert_eq!(validate(&draft), Err(FormError::InvalidEmail));

        draft.email = "a@b.com".into();
        assert_eq!(validate(&draft), Err(FormError::InvalidFee));
    }

    proptest! {
        #[test]
        fn prop_mobile_valid_iff_ten_digits(s in "[0-9a-z]{0,14}") {
            let expected = s.len() == 10 && s.chars().all(|c| c.is_ascii_digit());
            prop_assert_eq!(is_valid_mobile(&s), expected);
        }

        #[test]
        fn prop_nonnegative_numbers_parse(value in 0.0f64..1_000_000.0) {
            let text = format!("{}", value);
            prop_assert_eq!(parse_fee(&text), Ok(Some(value)));
        }

        #[test]
        fn prop_negative_numbers_rejected(value in -1_000_000.0f64..-0.001) {
            let text = format!("{}", value);
            prop_assert_eq!(parse_fee(&text), Err(FormError::InvalidFee));
        }
    }
}
