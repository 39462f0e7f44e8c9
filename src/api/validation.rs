use chrono::{NaiveDate, NaiveTime};

use super::ApiError;
use crate::constants::limits::MAX_LIST_LIMIT;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, MAX_LIST_LIMIT
        )));
    }
    Ok(limit)
}

/// Parse a user-entered date, strictly `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}

/// Parse a user-entered time of day, `HH:MM` or `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, ApiError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| ApiError::validation(format!("Invalid time '{}', expected HH:MM", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id(1).is_ok());
        assert!(validate_id(12345).is_ok());
        assert!(validate_id(0).is_err());
        assert!(validate_id(-1).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(500).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(MAX_LIST_LIMIT + 1).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_date(" 2025-06-01 ").is_ok());
        assert!(parse_date("2024-13-45").is_err());
        assert!(parse_date("01.06.2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("19:30").unwrap(),
            NaiveTime::from_hms_opt(19, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("19:30:15").unwrap(),
            NaiveTime::from_hms_opt(19, 30, 15).unwrap()
        );
        assert!(parse_time("25:99").is_err());
        assert!(parse_time("7pm").is_err());
        assert!(parse_time("").is_err());
    }
}
