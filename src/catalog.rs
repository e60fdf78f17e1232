//! Product catalog loaded from a flat JSON file

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bundled demo inventory
const BUILTIN_PRODUCTS: &str = include_str!("../data/products.json");

/// A single product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub category: String,
    pub color: String,
    pub price: f64,
    pub rating: f64,
    pub image_url: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Inventory overview
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogStats {
    pub total_products: usize,
    pub categories: Vec<String>,
    pub colors: Vec<String>,
    pub price_range: PriceRange,
    pub avg_rating: f64,
}

/// In-memory product list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load a JSON array of products from disk
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog at {:?}", path))?;
        let products: Vec<Product> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog at {:?}", path))?;
        tracing::info!("Loaded {} products from {:?}", products.len(), path);
        Self::from_products(products)
    }

    /// The inventory shipped with the binary
    pub fn builtin() -> Result<Self> {
        let products: Vec<Product> =
            serde_json::from_str(BUILTIN_PRODUCTS).context("Failed to parse bundled catalog")?;
        Self::from_products(products)
    }

    pub fn from_products(products: Vec<Product>) -> Result<Self> {
        for product in &products {
            validate_product(product)?;
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Summary numbers for the inventory overview.
    ///
    /// Categories and colors keep first-seen order; callers sort for display.
    pub fn stats(&self) -> CatalogStats {
        if self.products.is_empty() {
            return CatalogStats::default();
        }

        let mut categories: Vec<String> = Vec::new();
        let mut colors: Vec<String> = Vec::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut price_sum = 0.0;
        let mut rating_sum = 0.0;

        for p in &self.products {
            if !categories.contains(&p.category) {
                categories.push(p.category.clone());
            }
            if !colors.contains(&p.color) {
                colors.push(p.color.clone());
            }
            min = min.min(p.price);
            max = max.max(p.price);
            price_sum += p.price;
            rating_sum += p.rating;
        }

        let n = self.products.len() as f64;
        CatalogStats {
            total_products: self.products.len(),
            categories,
            colors,
            price_range: PriceRange {
                min,
                max,
                avg: price_sum / n,
            },
            avg_rating: rating_sum / n,
        }
    }
}

fn validate_product(p: &Product) -> Result<()> {
    if !p.price.is_finite() || p.price < 0.0 {
        bail!("Product '{}' has invalid price {}", p.name, p.price);
    }
    if !p.rating.is_finite() || !(0.0..=5.0).contains(&p.rating) {
        bail!("Product '{}' has rating {} outside 0-5", p.name, p.rating);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sample_products() -> Vec<Product> {
    let make = |name: &str, category: &str, color: &str, price: f64, rating: f64, n: u32| Product {
        name: name.to_string(),
        category: category.to_string(),
        color: color.to_string(),
        price,
        rating,
        image_url: format!("url{}", n),
        description: format!("desc{}", n),
    };
    vec![
        make("Red Dress", "dress", "red", 150.0, 4.5, 1),
        make("Blue Jeans", "jeans", "blue", 89.99, 4.2, 2),
        make("Black Jacket", "jacket", "black", 299.99, 4.8, 3),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stats() {
        let catalog = Catalog::from_products(sample_products()).unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.total_products, 3);
        assert!(stats.categories.contains(&"dress".to_string()));
        assert!(stats.colors.contains(&"red".to_string()));
        assert_eq!(stats.price_range.min, 89.99);
        assert_eq!(stats.price_range.max, 299.99);
        assert!((stats.avg_rating - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_catalog() {
        let stats = Catalog::default().stats();
        assert_eq!(stats.total_products, 0);
        assert!(stats.categories.is_empty());
        assert_eq!(stats.price_range.max, 0.0);
    }

    #[test]
    fn test_stats_unique_in_first_seen_order() {
        let mut products = sample_products();
        let mut extra = products[0].clone();
        extra.name = "Another Red Dress".to_string();
        products.push(extra);
        let stats = Catalog::from_products(products).unwrap().stats();
        assert_eq!(stats.categories, vec!["dress", "jeans", "jacket"]);
        assert_eq!(stats.colors, vec!["red", "blue", "black"]);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, serde_json::to_string(&sample_products()).unwrap()).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.products()[1].name, "Blue Jeans");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let mut products = sample_products();
        products[2].rating = 7.0;
        let err = Catalog::from_products(products).unwrap_err();
        assert!(err.to_string().contains("Black Jacket"));
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let stats = catalog.stats();
        for category in ["dress", "jeans", "shirt", "shoes", "jacket"] {
            assert!(stats.categories.iter().any(|c| c == category), "missing {}", category);
        }
    }
}
