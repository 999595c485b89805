use serde::{Deserialize, Serialize};

/// Transport-level classification of one category or sweep-query fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// 2xx with a well-formed items list, possibly empty.
    Success,
    /// 404: the category has no addressable item listing. Common, not an error.
    EmptyNotFound,
    /// Timeout, malformed body, or any other non-2xx status.
    TransportError,
}

/// Per-category tally, recorded for every category visited in a harvest,
/// including empty and failed ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStat {
    pub slug: String,
    pub name: String,
    pub path: String,
    /// Items the category fetch returned this run.
    pub item_count: usize,
    /// How many of those were not already in the store at merge time.
    /// Always `<= item_count`.
    pub new_item_count: usize,
    pub outcome: FetchOutcome,
    /// Transport error detail; `Some` iff `outcome` is `TransportError`.
    pub error: Option<String>,
}

/// Per-query tally for the discovery sweep, mirroring [`CategoryStat`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepStat {
    pub query: String,
    pub item_count: usize,
    pub new_item_count: usize,
    pub outcome: FetchOutcome,
    pub error: Option<String>,
}

/// Completeness confidence for a finished harvest. Advisory only; a Suspect
/// verdict never blocks persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletenessVerdict {
    Confident,
    Suspect,
}

/// A category whose item count reached the configured page cap, meaning its
/// true size may exceed what one capped response can carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedCategory {
    pub slug: String,
    pub name: String,
    pub item_count: usize,
}

/// A category whose fetch ended in a transport error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCategory {
    pub slug: String,
    pub name: String,
    pub error: String,
}

/// End-of-run aggregates handed to persistence and operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestReport {
    pub venue: String,
    pub language: String,
    /// Categories visited, whatever their outcome.
    pub total_categories: usize,
    /// Categories with a Success outcome and at least one item.
    pub productive_categories: usize,
    pub unique_products: usize,
    /// Products first discovered by the sweep rather than category walking.
    pub sweep_new_items: usize,
    pub failed_categories: Vec<FailedCategory>,
    pub flagged_categories: Vec<FlaggedCategory>,
    pub verdict: CompletenessVerdict,
    /// True when the run was stopped cooperatively before finishing; the
    /// partial results are still valid and persisted.
    pub cancelled: bool,
}

impl HarvestReport {
    #[must_use]
    pub fn is_suspect(&self) -> bool {
        self.verdict == CompletenessVerdict::Suspect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&FetchOutcome::EmptyNotFound).unwrap();
        assert_eq!(json, "\"empty_not_found\"");
    }

    #[test]
    fn verdict_serializes_snake_case() {
        let json = serde_json::to_string(&CompletenessVerdict::Suspect).unwrap();
        assert_eq!(json, "\"suspect\"");
    }

    #[test]
    fn report_is_suspect_follows_verdict() {
        let mut report = HarvestReport {
            venue: "bravo-storefront".to_string(),
            language: "az".to_string(),
            total_categories: 3,
            productive_categories: 2,
            unique_products: 8,
            sweep_new_items: 0,
            failed_categories: vec![],
            flagged_categories: vec![],
            verdict: CompletenessVerdict::Confident,
            cancelled: false,
        };
        assert!(!report.is_suspect());
        report.verdict = CompletenessVerdict::Suspect;
        assert!(report.is_suspect());
    }
}
