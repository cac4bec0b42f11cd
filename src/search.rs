//! Free-text case search.

use crate::case_model::Case;

/// Returns the cases matching `query`, in collection order.
///
/// An empty query matches everything. Otherwise a case matches when the
/// query, ignoring case, is a substring of its case number, license plate,
/// description or status label.
///
/// ```rust
/// use workshop_case_core::{search::filter, seed::seed_cases};
///
/// let cases = seed_cases();
/// assert_eq!(filter(&cases, "").len(), cases.len());
/// assert_eq!(filter(&cases, "ab123")[0].case_number, "SAK-123456");
/// ```
pub fn filter<'a>(cases: &'a [Case], query: &str) -> Vec<&'a Case> {
    if query.is_empty() {
        return cases.iter().collect();
    }

    let needle = query.to_lowercase();
    cases.iter().filter(|case| matches(case, &needle)).collect()
}

fn matches(case: &Case, needle: &str) -> bool {
    [
        case.case_number.as_str(),
        case.license_plate.as_str(),
        case.description.as_str(),
        case.status.label(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}
