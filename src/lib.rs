//! Saleseer - natural-language product recommendations
//!
//! Turns a free-text shopping query into structured filter criteria (via a
//! hosted chat model, with a keyword fallback) and ranks a product catalog.

pub mod catalog;
pub mod config;
pub mod criteria;
pub mod error;
pub mod explain;
pub mod extractor;
pub mod fallback;
pub mod filter;
pub mod history;
pub mod recommender;
pub mod render;
pub mod validation;

pub use catalog::{Catalog, CatalogStats, PriceRange, Product};
pub use config::Config;
pub use criteria::Criteria;
pub use error::{ConfigError, ExtractError};
pub use explain::recommendation_explanation;
pub use extractor::{parse_completion, CompletionClient, CriteriaExtractor, Extraction, ExtractionSource};
pub use fallback::KeywordParser;
pub use filter::{filter_products, recommend};
pub use history::SearchHistory;
pub use recommender::{Recommender, SearchOutcome};
pub use render::OutputFormat;
pub use validation::{ValidationReport, Validator};
