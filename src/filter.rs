//! Criteria-based product filtering and ranking

use std::cmp::Ordering;
use std::sync::OnceLock;

use crate::catalog::Product;
use crate::criteria::Criteria;
use crate::fallback::KeywordParser;

/// Keep products matching every present criterion, best first.
///
/// Category and color are case-insensitive substring matches; price and
/// rating bounds are inclusive. Ordering is rating descending, then price
/// ascending; equal products keep catalog order.
pub fn filter_products(products: &[Product], criteria: &Criteria) -> Vec<Product> {
    let category = criteria.category.as_ref().map(|c| c.to_lowercase());
    let color = criteria.color.as_ref().map(|c| c.to_lowercase());

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| {
            category
                .as_ref()
                .map_or(true, |c| p.category.to_lowercase().contains(c.as_str()))
        })
        .filter(|p| {
            color
                .as_ref()
                .map_or(true, |c| p.color.to_lowercase().contains(c.as_str()))
        })
        .filter(|p| criteria.price_max.map_or(true, |max| p.price <= max))
        .filter(|p| criteria.price_min.map_or(true, |min| p.price >= min))
        .filter(|p| criteria.rating_min.map_or(true, |min| p.rating >= min))
        .cloned()
        .collect();

    matched.sort_by(rank);
    matched
}

/// Free-text query to ranked products.
///
/// Uses `criteria` when extraction already happened, otherwise parses the
/// query locally.
pub fn recommend(products: &[Product], query: &str, criteria: Option<&Criteria>) -> Vec<Product> {
    match criteria {
        Some(criteria) => filter_products(products, criteria),
        None => filter_products(products, &keyword_parser().parse(query)),
    }
}

fn keyword_parser() -> &'static KeywordParser {
    static PARSER: OnceLock<KeywordParser> = OnceLock::new();
    PARSER.get_or_init(KeywordParser::new)
}

fn rank(a: &Product, b: &Product) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.price.total_cmp(&b.price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_products;

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    fn criteria() -> Criteria {
        Criteria::default()
    }

    #[test]
    fn test_filter_by_category() {
        let c = Criteria {
            category: Some("dress".to_string()),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Red Dress"]);
    }

    #[test]
    fn test_filter_by_color() {
        let c = Criteria {
            color: Some("Blue".to_string()),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Blue Jeans"]);
    }

    #[test]
    fn test_filter_by_price_max() {
        let c = Criteria {
            price_max: Some(200.0),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Red Dress", "Blue Jeans"]);
    }

    #[test]
    fn test_filter_by_price_min() {
        let c = Criteria {
            price_min: Some(100.0),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Black Jacket", "Red Dress"]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let c = Criteria {
            price_min: Some(150.0),
            price_max: Some(150.0),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Red Dress"]);
    }

    #[test]
    fn test_filter_by_rating() {
        let c = Criteria {
            rating_min: Some(4.5),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Black Jacket", "Red Dress"]);
    }

    #[test]
    fn test_combined_filters() {
        let c = Criteria {
            price_max: Some(200.0),
            rating_min: Some(4.3),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Red Dress"]);
    }

    #[test]
    fn test_category_dress_under_200() {
        let c = Criteria {
            category: Some("dress".to_string()),
            price_max: Some(200.0),
            ..criteria()
        };
        let result = filter_products(&sample_products(), &c);
        assert_eq!(names(&result), vec!["Red Dress"]);
    }

    #[test]
    fn test_no_results() {
        let c = Criteria {
            category: Some("shoes".to_string()),
            color: Some("purple".to_string()),
            ..criteria()
        };
        assert!(filter_products(&sample_products(), &c).is_empty());
    }

    #[test]
    fn test_empty_criteria_returns_everything_ranked() {
        let result = filter_products(&sample_products(), &criteria());
        assert_eq!(names(&result), vec!["Black Jacket", "Red Dress", "Blue Jeans"]);
    }

    #[test]
    fn test_rating_ties_sort_by_price() {
        let mut products = sample_products();
        products[0].rating = 4.8;
        products[0].price = 299.99;
        products[0].name = "Pricey Dress".to_string();
        products[1].rating = 4.8;
        let result = filter_products(&products, &criteria());
        // Jeans are cheapest; dress and jacket share rating and price, catalog order holds
        assert_eq!(names(&result), vec!["Blue Jeans", "Pricey Dress", "Black Jacket"]);
    }

    #[test]
    fn test_substring_category_match() {
        let c = Criteria {
            category: Some("jean".to_string()),
            ..criteria()
        };
        assert_eq!(names(&filter_products(&sample_products(), &c)), vec!["Blue Jeans"]);
    }

    #[test]
    fn test_recommend_without_criteria_parses_query() {
        let result = recommend(&sample_products(), "something under $200", None);
        assert_eq!(names(&result), vec!["Red Dress", "Blue Jeans"]);
    }

    #[test]
    fn test_recommend_reuses_one_parser() {
        assert!(std::ptr::eq(keyword_parser(), keyword_parser()));
        let first = recommend(&sample_products(), "jackets over 200", None);
        let second = recommend(&sample_products(), "jackets over 200", None);
        assert_eq!(names(&first), vec!["Black Jacket"]);
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn test_recommend_prefers_given_criteria() {
        let c = Criteria {
            color: Some("black".to_string()),
            ..criteria()
        };
        let result = recommend(&sample_products(), "red dress", Some(&c));
        assert_eq!(names(&result), vec!["Black Jacket"]);
    }
}
