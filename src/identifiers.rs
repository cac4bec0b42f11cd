//! Time-derived identifiers for cases and updates.
//!
//! Both identifiers start from the millisecond clock. The clock alone does not
//! guarantee uniqueness (two cases created in the same millisecond, or 10^6 ms
//! apart, share a suffix), so generation takes the set of taken keys and bumps
//! the candidate until it is free.

use crate::app_response::AppResponse;

pub const CASE_NUMBER_PREFIX: &str = "SAK-";
const CASE_SUFFIX_SPACE: i64 = 1_000_000;

pub fn format_case_number(suffix: i64) -> String {
    format!("{CASE_NUMBER_PREFIX}{:06}", suffix.rem_euclid(CASE_SUFFIX_SPACE))
}

/// Picks a case number from the last six digits of `now_millis`, moving to the
/// next suffix (wrapping at 999999) while `is_taken` says the key exists.
pub fn generate_case_number<F>(now_millis: i64, is_taken: F) -> Result<String, AppResponse>
where
    F: Fn(&str) -> bool,
{
    let start = now_millis.rem_euclid(CASE_SUFFIX_SPACE);
    for offset in 0..CASE_SUFFIX_SPACE {
        let candidate = format_case_number(start + offset);
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(AppResponse::Conflict("Every case number is in use".to_string()))
}

/// Picks an update id from `now_millis`, incrementing while `is_taken`.
pub fn generate_update_id<F>(now_millis: i64, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut candidate = now_millis;
    loop {
        let id = candidate.to_string();
        if !is_taken(&id) {
            return id;
        }
        candidate = candidate.saturating_add(1);
    }
}
