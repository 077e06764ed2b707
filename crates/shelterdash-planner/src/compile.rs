//! Filter compilation.

use std::collections::BTreeSet;

use shelterdash_core::prelude::{Predicate, Query, RescueCategory};
use shelterdash_core::record::fields;

/// Breeds picked explicitly by the operator. Empty means "no selection".
pub type BreedSelection = BTreeSet<String>;

/// Compile a category and an explicit breed selection into one query.
///
/// The breed constraint is the intersection of the category allow-list and
/// the explicit selection when both exist, whichever exists otherwise, and
/// absent when neither does. An empty intersection is a valid query that
/// matches nothing. The category's static allow-list is only ever copied.
pub fn compile(category: RescueCategory, explicit_breeds: &BreedSelection) -> Query {
    let mut query = match category.preset() {
        None => Query::new(),
        Some(preset) => Query::new()
            .with(
                fields::BREED,
                Predicate::In(preset.breeds.iter().map(|b| b.to_string()).collect()),
            )
            .with(fields::SEX_UPON_OUTCOME, Predicate::Eq(preset.sex.into()))
            .with(
                fields::AGE_UPON_OUTCOME_IN_WEEKS,
                Predicate::Range {
                    lo: Some(preset.age_weeks.lo),
                    hi: Some(preset.age_weeks.hi),
                },
            ),
    };

    if !explicit_breeds.is_empty() {
        let breeds = match query.breeds() {
            Some(allowed) => allowed.intersection(explicit_breeds).cloned().collect(),
            None => explicit_breeds.clone(),
        };
        query = query.with(fields::BREED, Predicate::In(breeds));
    }

    tracing::debug!(
        %category,
        explicit = explicit_breeds.len(),
        predicates = query.len(),
        "compiled filter"
    );
    query
}
