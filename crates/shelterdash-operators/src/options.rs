//! Breed dropdown options.

use shelterdash_core::prelude::AnimalRecord;

/// Distinct breeds in first-seen order.
pub fn breed_options(rows: &[AnimalRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter_map(|r| r.breed.as_deref())
        .filter(|b| seen.insert(*b))
        .map(str::to_string)
        .collect()
}
