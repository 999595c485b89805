//! Completeness verification for a finished category walk.

use aisle_core::{CategoryStat, CompletenessVerdict, FlaggedCategory};

/// Checks whether any category's item count reached `page_cap`.
///
/// A count at the cap means the response may have been truncated to exactly
/// the cap, so the true category size is unknowable from this run and the
/// whole harvest is downgraded to [`CompletenessVerdict::Suspect`]. The
/// flagged categories are returned alongside so operators know where the
/// doubt lives. An advisory verdict only; nothing is discarded.
#[must_use]
pub fn verify_completeness(
    stats: &[CategoryStat],
    page_cap: usize,
) -> (CompletenessVerdict, Vec<FlaggedCategory>) {
    let flagged: Vec<FlaggedCategory> = stats
        .iter()
        .filter(|stat| stat.item_count >= page_cap)
        .map(|stat| FlaggedCategory {
            slug: stat.slug.clone(),
            name: stat.name.clone(),
            item_count: stat.item_count,
        })
        .collect();

    let verdict = if flagged.is_empty() {
        CompletenessVerdict::Confident
    } else {
        CompletenessVerdict::Suspect
    };
    (verdict, flagged)
}
