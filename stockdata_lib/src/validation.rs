use chrono::NaiveDate;

use crate::error::IngestError;

pub const MAX_LIMIT: i64 = 10_000;

/// Validate a date in YYYY-MM-DD format.
pub fn validate_date(input: &str) -> Result<NaiveDate, IngestError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        IngestError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate an inclusive date range; either end may be open.
pub fn validate_date_range(
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
) -> Result<(), IngestError> {
    if let (Some(since), Some(until)) = (since, until) {
        if since > until {
            return Err(IngestError::InvalidInput(format!(
                "since ({}) must not be after until ({})",
                since, until
            )));
        }
    }
    Ok(())
}

/// Validate a row limit: must be 1..=MAX_LIMIT.
pub fn validate_limit(limit: i64) -> Result<i64, IngestError> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(IngestError::InvalidInput(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit)
}
