//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entity enforces the same rules.

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, Money, ResultEngine};

pub(crate) const NAME_MAX_CHARS: usize = 100;
pub(crate) const DESCRIPTION_MAX_CHARS: usize = 255;
/// Largest amount a transaction or budget may carry: 9,999,999,999.99.
pub(crate) const AMOUNT_MAX: Money = Money::new(999_999_999_999);

/// Trim, collapse inner whitespace and compose to NFC.
fn normalize_display(input: &str) -> String {
    let composed: String = input.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a required display name (category or budget name).
pub(crate) fn normalize_required_name(value: &str, field: &str) -> ResultEngine<String> {
    let name = normalize_display(value);
    if name.is_empty() {
        return Err(EngineError::invalid(field, "must not be empty"));
    }
    if name.chars().count() > NAME_MAX_CHARS {
        return Err(EngineError::invalid(
            field,
            format!("must be at most {NAME_MAX_CHARS} characters"),
        ));
    }
    Ok(name)
}

/// Normalize free text; blank input becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>, field: &str) -> ResultEngine<Option<String>> {
    let Some(text) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(EngineError::invalid(
            field,
            format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
    Ok(Some(text.to_string()))
}

pub(crate) fn require_positive_amount(amount: Money) -> ResultEngine<Money> {
    if !amount.is_positive() {
        return Err(EngineError::invalid("amount", "must be greater than 0"));
    }
    if amount > AMOUNT_MAX {
        return Err(EngineError::invalid(
            "amount",
            format!("must be at most {AMOUNT_MAX}"),
        ));
    }
    Ok(amount)
}

/// Budgets need `end_date` strictly after `start_date`.
pub(crate) fn require_date_order(start_date: NaiveDate, end_date: NaiveDate) -> ResultEngine<()> {
    if end_date <= start_date {
        return Err(EngineError::invalid(
            "end_date",
            "end_date must be after start_date",
        ));
    }
    Ok(())
}

/// Optional inclusive filter bounds must not be inverted.
pub(crate) fn validate_date_filter(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> ResultEngine<()> {
    if let (Some(start), Some(end)) = (start_date, end_date)
        && start > end
    {
        return Err(EngineError::invalid(
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_collapsed() {
        assert_eq!(
            normalize_required_name("  Eating   out ", "name").unwrap(),
            "Eating out"
        );
        assert!(normalize_required_name("   ", "name").is_err());
        assert!(normalize_required_name(&"x".repeat(101), "name").is_err());
    }

    #[test]
    fn names_are_composed() {
        // "e" + combining acute accent
        let decomposed = "Cafe\u{301}";
        assert_eq!(normalize_required_name(decomposed, "name").unwrap(), "Café");
    }

    #[test]
    fn blank_text_is_none() {
        assert_eq!(normalize_optional_text(Some("  "), "description").unwrap(), None);
        assert_eq!(
            normalize_optional_text(Some(" weekly shop "), "description").unwrap(),
            Some("weekly shop".to_string())
        );
    }

    #[test]
    fn amounts_are_positive_and_capped() {
        assert!(require_positive_amount(Money::new(-1)).is_err());
        assert_eq!(
            require_positive_amount(AMOUNT_MAX).unwrap(),
            Money::new(999_999_999_999)
        );
        let err = require_positive_amount(Money::new(1_000_000_000_000)).unwrap_err();
        assert_eq!(err.fields()[0].field, "amount");
        assert_eq!(err.fields()[0].message, "must be at most 9999999999.99");
    }

    #[test]
    fn date_order_is_strict() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert!(require_date_order(jan1, jan31).is_ok());
        assert!(require_date_order(jan1, jan1).is_err());
        assert!(require_date_order(jan31, jan1).is_err());
    }
}
