//! Envelopes for the datasets a run persists.
//!
//! Three datasets leave every run: the flattened category tree with its
//! per-category tallies, the deduplicated product list, and the run report
//! with the sweep tallies. Each is stamped with the venue, language, and
//! harvest time so files on disk stay interpretable without their run logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aisle_core::{Category, CategoryStat, HarvestOptions, HarvestReport, Product, SweepStat};

/// Name under which the category tree dataset is persisted.
pub const CATEGORIES_DATASET: &str = "categories";
/// Name under which the product list dataset is persisted.
pub const PRODUCTS_DATASET: &str = "products";
/// Name under which the run report is persisted.
pub const REPORT_DATASET: &str = "report";

/// The flattened category tree of one venue, with the per-category fetch
/// tallies of the walk that visited it. Stats come in visit order, not
/// slug-keyed: duplicate slugs in one tree are legal and must not collapse.
/// The stats are empty when no walk ran, as for the `categories` subcommand.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesDataset {
    pub venue: String,
    pub language: String,
    pub harvested_at: DateTime<Utc>,
    pub category_count: usize,
    pub categories: Vec<Category>,
    pub category_stats: Vec<CategoryStat>,
}

impl CategoriesDataset {
    #[must_use]
    pub fn new(
        options: &HarvestOptions,
        categories: Vec<Category>,
        category_stats: Vec<CategoryStat>,
    ) -> Self {
        CategoriesDataset {
            venue: options.venue_slug.clone(),
            language: options.language.clone(),
            harvested_at: Utc::now(),
            category_count: categories.len(),
            categories,
            category_stats,
        }
    }
}

/// The deduplicated products of one run, in first-discovery order.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsDataset {
    pub venue: String,
    pub language: String,
    pub harvested_at: DateTime<Utc>,
    pub product_count: usize,
    pub products: Vec<Product>,
}

impl ProductsDataset {
    #[must_use]
    pub fn new(options: &HarvestOptions, products: Vec<Product>) -> Self {
        ProductsDataset {
            venue: options.venue_slug.clone(),
            language: options.language.clone(),
            harvested_at: Utc::now(),
            product_count: products.len(),
            products,
        }
    }
}

/// The run report plus the per-query sweep tallies, timestamped.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportDataset {
    pub harvested_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: HarvestReport,
    pub sweep_stats: Vec<SweepStat>,
}

impl ReportDataset {
    #[must_use]
    pub fn new(report: HarvestReport, sweep_stats: Vec<SweepStat>) -> Self {
        ReportDataset {
            harvested_at: Utc::now(),
            report,
            sweep_stats,
        }
    }
}
