pub mod client;
pub mod datasets;
pub mod error;
pub mod flatten;
pub mod normalize;
pub mod runner;
pub mod sift;
pub mod sink;
pub mod store;
pub mod transport;
pub mod types;
pub mod verify;

pub use client::AssortmentClient;
pub use datasets::{
    CategoriesDataset, ProductsDataset, ReportDataset, CATEGORIES_DATASET, PRODUCTS_DATASET,
    REPORT_DATASET,
};
pub use error::HarvestError;
pub use flatten::flatten_categories;
pub use normalize::normalize_item;
pub use runner::Harvester;
pub use sift::extract_product_candidates;
pub use sink::{DatasetSink, MemorySink, SinkError};
pub use store::ProductStore;
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use types::{AssortmentResponse, CategoryImage, CategoryNode, ItemsEnvelope};
pub use verify::verify_completeness;
