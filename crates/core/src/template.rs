//! Template constants and validation helpers.

use crate::error::CoreError;

/// Templates are tagged with a calendar month, 1-12.
pub const MIN_MONTH: i32 = 1;
pub const MAX_MONTH: i32 = 12;

/// And optionally a week of that month, 1-5. Absence means the template
/// applies to the whole month.
pub const MIN_WEEK: i32 = 1;
pub const MAX_WEEK: i32 = 5;

/// Validate a template month.
pub fn validate_month(month: i32) -> Result<(), CoreError> {
    if (MIN_MONTH..=MAX_MONTH).contains(&month) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid month {month}. Must be between {MIN_MONTH} and {MAX_MONTH}"
        )))
    }
}

/// Validate an optional template week.
pub fn validate_week(week: Option<i32>) -> Result<(), CoreError> {
    match week {
        None => Ok(()),
        Some(w) if (MIN_WEEK..=MAX_WEEK).contains(&w) => Ok(()),
        Some(w) => Err(CoreError::Validation(format!(
            "Invalid week {w}. Must be between {MIN_WEEK} and {MAX_WEEK}"
        ))),
    }
}

/// Confirm rate used to rank templates: approvals as a rounded percentage
/// of sends. Zero sends means a rate of zero, not a division error.
pub fn confirm_rate(send_count: i32, approve_count: i32) -> i32 {
    if send_count == 0 {
        return 0;
    }
    ((approve_count as f64 / send_count as f64) * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_months_accepted() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(6).is_ok());
        assert!(validate_month(12).is_ok());
    }

    #[test]
    fn test_invalid_months_rejected() {
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
        assert!(validate_month(-3).is_err());
    }

    #[test]
    fn test_week_is_optional() {
        assert!(validate_week(None).is_ok());
        assert!(validate_week(Some(1)).is_ok());
        assert!(validate_week(Some(5)).is_ok());
    }

    #[test]
    fn test_out_of_range_week_rejected() {
        assert!(validate_week(Some(0)).is_err());
        assert!(validate_week(Some(6)).is_err());
    }

    #[test]
    fn test_confirm_rate_rounds() {
        assert_eq!(confirm_rate(0, 0), 0);
        assert_eq!(confirm_rate(3, 1), 33);
        assert_eq!(confirm_rate(3, 2), 67);
        assert_eq!(confirm_rate(10, 10), 100);
    }
}
