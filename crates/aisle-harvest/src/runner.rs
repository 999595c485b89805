//! The harvest orchestrator: walk every category, sweep for strays,
//! verify, persist.
//!
//! Work is strictly sequential with a fixed pause after every unit, one
//! venue per run. A failed category is recorded and skipped, never
//! retried here; a failed dataset write ends the run. Cancellation is
//! cooperative: the loops check between units, and whatever was gathered
//! up to that point is still verified and persisted.

use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use aisle_core::{
    Category, CategoryStat, FailedCategory, FetchOutcome, HarvestOptions, HarvestReport,
    Provenance, SweepStat,
};

use crate::client::AssortmentClient;
use crate::datasets::{
    CategoriesDataset, ProductsDataset, ReportDataset, CATEGORIES_DATASET, PRODUCTS_DATASET,
    REPORT_DATASET,
};
use crate::error::HarvestError;
use crate::flatten::flatten_categories;
use crate::sink::{DatasetSink, SinkError};
use crate::store::ProductStore;
use crate::transport::Transport;
use crate::verify::verify_completeness;

/// Drives one full harvest of one venue.
pub struct Harvester<T> {
    client: AssortmentClient<T>,
    options: HarvestOptions,
    cancel: CancellationToken,
}

impl<T: Transport> Harvester<T> {
    pub fn new(client: AssortmentClient<T>, options: HarvestOptions, cancel: CancellationToken) -> Self {
        Harvester {
            client,
            options,
            cancel,
        }
    }

    /// Fetches and flattens the venue's category tree without harvesting.
    ///
    /// # Errors
    ///
    /// Propagates any [`HarvestError`] from the assortment fetch.
    pub async fn fetch_category_tree(&self) -> Result<Vec<Category>, HarvestError> {
        let assortment = self.client.fetch_assortment().await?;
        Ok(flatten_categories(&assortment.categories))
    }

    /// Runs the whole harvest: tree, category walk, discovery sweep,
    /// completeness verdict, and persistence of all three datasets.
    ///
    /// # Errors
    ///
    /// Fails if the category tree cannot be fetched or any dataset cannot
    /// be persisted. Per-category and per-query fetch failures do not fail
    /// the run; they are recorded in the stats and the report.
    pub async fn run(&self, sink: &dyn DatasetSink) -> Result<HarvestReport, HarvestError> {
        tracing::info!(
            venue = %self.options.venue_slug,
            language = %self.options.language,
            "starting harvest"
        );

        let categories = self.fetch_category_tree().await?;
        tracing::info!(categories = categories.len(), "category tree flattened");

        let mut store = ProductStore::new();
        let (category_stats, crawl_cancelled) = self.crawl_categories(&categories, &mut store).await;

        let (sweep_stats, sweep_cancelled) = if crawl_cancelled {
            (Vec::new(), false)
        } else {
            self.sweep(&mut store).await
        };
        let cancelled = crawl_cancelled || sweep_cancelled;

        let (verdict, flagged_categories) =
            verify_completeness(&category_stats, self.options.page_cap);

        let failed_categories: Vec<FailedCategory> = category_stats
            .iter()
            .filter(|stat| stat.outcome == FetchOutcome::TransportError)
            .map(|stat| FailedCategory {
                slug: stat.slug.clone(),
                name: stat.name.clone(),
                error: stat.error.clone().unwrap_or_default(),
            })
            .collect();
        let productive_categories = category_stats
            .iter()
            .filter(|stat| stat.outcome == FetchOutcome::Success && stat.item_count > 0)
            .count();
        let sweep_new_items = sweep_stats.iter().map(|stat| stat.new_item_count).sum();

        let report = HarvestReport {
            venue: self.options.venue_slug.clone(),
            language: self.options.language.clone(),
            total_categories: category_stats.len(),
            productive_categories,
            unique_products: store.len(),
            sweep_new_items,
            failed_categories,
            flagged_categories,
            verdict,
            cancelled,
        };

        persist(
            sink,
            CATEGORIES_DATASET,
            &CategoriesDataset::new(&self.options, categories, category_stats),
        )
        .await?;
        persist(
            sink,
            PRODUCTS_DATASET,
            &ProductsDataset::new(&self.options, store.into_products()),
        )
        .await?;
        persist(
            sink,
            REPORT_DATASET,
            &ReportDataset::new(report.clone(), sweep_stats),
        )
        .await?;

        tracing::info!(
            unique_products = report.unique_products,
            failed_categories = report.failed_categories.len(),
            verdict = ?report.verdict,
            cancelled = report.cancelled,
            "harvest finished"
        );
        Ok(report)
    }

    /// Visits every category in order, pausing after each one. Returns the
    /// per-category stats and whether cancellation cut the walk short.
    async fn crawl_categories(
        &self,
        categories: &[Category],
        store: &mut ProductStore,
    ) -> (Vec<CategoryStat>, bool) {
        let mut stats = Vec::with_capacity(categories.len());
        for category in categories {
            if self.cancel.is_cancelled() {
                tracing::info!(visited = stats.len(), "cancelled during category walk");
                return (stats, true);
            }
            stats.push(self.visit_category(category, store).await);
            self.pause(self.options.request_delay).await;
        }
        (stats, false)
    }

    async fn visit_category(&self, category: &Category, store: &mut ProductStore) -> CategoryStat {
        let provenance = Provenance::Category {
            id: category.id.clone(),
            name: category.name.clone(),
            slug: category.slug.clone(),
        };
        match self.client.fetch_category_items(&category.slug).await {
            Ok(envelope) => {
                let item_count = envelope.items.len();
                let new_item_count = store.merge(&envelope.items, &provenance);
                tracing::debug!(
                    category = %category.slug,
                    item_count,
                    new_item_count,
                    "category fetched"
                );
                stat_for(category, item_count, new_item_count, FetchOutcome::Success, None)
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!(category = %category.slug, "category has no item listing");
                stat_for(category, 0, 0, FetchOutcome::EmptyNotFound, None)
            }
            Err(err) => {
                tracing::warn!(
                    category = %category.slug,
                    error = %err,
                    "category fetch failed, continuing with the rest"
                );
                stat_for(category, 0, 0, FetchOutcome::TransportError, Some(err.to_string()))
            }
        }
    }

    /// Runs broad search queries to catch items no category listing
    /// returned. Stops at the first query that adds nothing new: the
    /// queries are ordered broadest first, so a dry one means the catalog
    /// is exhausted.
    async fn sweep(&self, store: &mut ProductStore) -> (Vec<SweepStat>, bool) {
        let mut stats = Vec::new();
        for query in &self.options.sweep_queries {
            if self.cancel.is_cancelled() {
                tracing::info!(queries_run = stats.len(), "cancelled during discovery sweep");
                return (stats, true);
            }
            let stat = self.run_sweep_query(query, store).await;
            let new_items = stat.new_item_count;
            stats.push(stat);
            if new_items == 0 {
                tracing::info!(query = %query, "sweep query added nothing new, stopping sweep");
                break;
            }
            self.pause(self.options.sweep_delay).await;
        }
        (stats, false)
    }

    async fn run_sweep_query(&self, query: &str, store: &mut ProductStore) -> SweepStat {
        let provenance = Provenance::Search {
            query: query.to_owned(),
        };
        match self.client.search_items(query).await {
            Ok(envelope) => {
                let item_count = envelope.items.len();
                let new_item_count = store.merge(&envelope.items, &provenance);
                tracing::debug!(query = %query, item_count, new_item_count, "sweep query finished");
                SweepStat {
                    query: query.to_owned(),
                    item_count,
                    new_item_count,
                    outcome: FetchOutcome::Success,
                    error: None,
                }
            }
            Err(err) if err.is_not_found() => SweepStat {
                query: query.to_owned(),
                item_count: 0,
                new_item_count: 0,
                outcome: FetchOutcome::EmptyNotFound,
                error: None,
            },
            Err(err) => {
                tracing::warn!(query = %query, error = %err, "sweep query failed");
                SweepStat {
                    query: query.to_owned(),
                    item_count: 0,
                    new_item_count: 0,
                    outcome: FetchOutcome::TransportError,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Sleeps for `delay`, waking early on cancellation.
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = self.cancel.cancelled() => {}
        }
    }
}

fn stat_for(
    category: &Category,
    item_count: usize,
    new_item_count: usize,
    outcome: FetchOutcome,
    error: Option<String>,
) -> CategoryStat {
    CategoryStat {
        slug: category.slug.clone(),
        name: category.name.clone(),
        path: category.path.clone(),
        item_count,
        new_item_count,
        outcome,
        error,
    }
}

async fn persist<S: Serialize + Sync>(
    sink: &dyn DatasetSink,
    name: &str,
    dataset: &S,
) -> Result<(), HarvestError> {
    let value = serde_json::to_value(dataset).map_err(|e| HarvestError::Persist {
        name: name.to_owned(),
        source: SinkError::Serialize(e),
    })?;
    sink.persist(name, &value)
        .await
        .map_err(|e| HarvestError::Persist {
            name: name.to_owned(),
            source: e,
        })?;
    tracing::info!(dataset = name, "dataset persisted");
    Ok(())
}
