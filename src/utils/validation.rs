//! Centralized validation and helper functions.

/// Maximum number of pantry entries accepted from one file or payload
pub const MAX_PANTRY_ENTRIES: usize = 10_000;

/// Maximum number of recipes accepted in one catalog or payload
pub const MAX_RECIPES: usize = 50_000;

/// Safely convert usize to f64 for ratio calculations
///
/// Counts here are ingredient and recipe tallies, far inside the range f64
/// represents exactly.
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Clamp a ratio into [0, 1]. NaN becomes 0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp a user-supplied missing-ingredient threshold. Negative values become 0.
#[must_use]
pub fn clamp_max_missing(value: i64) -> usize {
    if value < 0 {
        tracing::debug!("max_missing {} clamped to 0", value);
        0
    } else {
        usize::try_from(value).unwrap_or(usize::MAX)
    }
}

/// Check if adding another pantry entry would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new entry.
/// Returns an error message if adding would exceed the limit, None if safe to add.
///
/// # Example
/// ```ignore
/// if check_pantry_limit(entries.len()).is_some() {
///     return Err(...);
/// }
/// entries.push(new_entry); // Safe to add
/// ```
#[must_use]
pub fn check_pantry_limit(count: usize) -> Option<String> {
    if count >= MAX_PANTRY_ENTRIES {
        Some(format!(
            "Too many pantry entries: adding another would exceed maximum of {MAX_PANTRY_ENTRIES}"
        ))
    } else {
        None
    }
}

/// Check if adding another recipe would exceed the maximum allowed.
#[must_use]
pub fn check_recipe_limit(count: usize) -> Option<String> {
    if count >= MAX_RECIPES {
        Some(format!(
            "Too many recipes: adding another would exceed maximum of {MAX_RECIPES}"
        ))
    } else {
        None
    }
}
