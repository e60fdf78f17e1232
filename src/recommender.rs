//! Query pipeline: extract criteria, summarize, filter, explain

use serde::Serialize;

use crate::catalog::{Catalog, Product};
use crate::criteria::Criteria;
use crate::explain::recommendation_explanation;
use crate::extractor::{CriteriaExtractor, ExtractionSource};
use crate::filter::filter_products;

/// Everything produced for one query
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub criteria: Criteria,
    pub source: ExtractionSource,
    pub summary: String,
    pub explanation: String,
    pub products: Vec<Product>,
}

pub struct Recommender {
    catalog: Catalog,
    extractor: CriteriaExtractor,
}

impl Recommender {
    pub fn new(catalog: Catalog, extractor: CriteriaExtractor) -> Self {
        Self { catalog, extractor }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn extractor(&self) -> &CriteriaExtractor {
        &self.extractor
    }

    pub fn search(&self, query: &str) -> SearchOutcome {
        let extraction = self.extractor.extract(query);
        let products = filter_products(self.catalog.products(), &extraction.criteria);
        tracing::debug!(
            "Query {:?} matched {} of {} products ({})",
            query,
            products.len(),
            self.catalog.len(),
            extraction.source.as_str()
        );

        SearchOutcome {
            query: query.trim().to_string(),
            summary: extraction.criteria.search_summary(query.trim()),
            explanation: recommendation_explanation(&products, &extraction.criteria),
            criteria: extraction.criteria,
            source: extraction.source,
            products,
        }
    }
}
