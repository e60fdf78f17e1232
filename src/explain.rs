//! Short recommendation insight shown above the results

use crate::catalog::Product;
use crate::criteria::{format_amount, format_rating, Criteria};

pub const NO_RESULTS: &str = "No products found matching your criteria. Try adjusting your search terms.";

pub fn recommendation_explanation(products: &[Product], criteria: &Criteria) -> String {
    if products.is_empty() {
        return NO_RESULTS.to_string();
    }

    let count = products.len();
    let mut parts = vec![format!("Found {} item{}", count, if count != 1 { "s" } else { "" })];

    let mut mentioned = Vec::new();
    if let Some(ref category) = criteria.category {
        mentioned.push(format!("in {}", category));
    }
    if let Some(ref color) = criteria.color {
        mentioned.push(format!("in {}", color));
    }
    if let Some(max) = criteria.price_max {
        mentioned.push(format!("under ${}", format_amount(max)));
    }
    if let Some(min) = criteria.price_min {
        mentioned.push(format!("over ${}", format_amount(min)));
    }
    if let Some(rating) = criteria.rating_min {
        mentioned.push(format!("with rating ≥ {}", format_rating(rating)));
    }
    if !mentioned.is_empty() {
        parts.push(mentioned.join(" "));
    }

    let avg_rating = products.iter().map(|p| p.rating).sum::<f64>() / count as f64;
    if avg_rating >= 4.5 {
        parts.push("• All items have excellent ratings".to_string());
    } else if avg_rating >= 4.0 {
        parts.push("• Items have good to excellent ratings".to_string());
    }

    if count > 1 {
        let min = products.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = products.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        parts.push(format!("• Price range: ${:.2} - ${:.2}", min, max));
    }

    format!("{}.", parts.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_products;

    fn dress_and_jeans() -> Vec<Product> {
        sample_products().into_iter().take(2).collect()
    }

    #[test]
    fn test_explanation_with_results() {
        let criteria = Criteria {
            category: Some("dress".to_string()),
            color: Some("red".to_string()),
            price_max: Some(200.0),
            ..Criteria::default()
        };
        let explanation = recommendation_explanation(&dress_and_jeans(), &criteria);

        assert!(explanation.contains("Found 2 items"));
        assert!(explanation.contains("in dress"));
        assert!(explanation.contains("in red"));
        assert!(explanation.contains("under $200"));
        assert!(explanation.contains("• Items have good to excellent ratings"));
        assert!(explanation.contains("• Price range: $89.99 - $150.00"));
        assert!(explanation.ends_with('.'));
    }

    #[test]
    fn test_explanation_no_results() {
        let criteria = Criteria {
            category: Some("shoes".to_string()),
            ..Criteria::default()
        };
        let explanation = recommendation_explanation(&[], &criteria);
        assert!(explanation.contains("No products found"));
    }

    #[test]
    fn test_explanation_single_result() {
        let single: Vec<Product> = sample_products().into_iter().take(1).collect();
        let criteria = Criteria {
            category: Some("dress".to_string()),
            ..Criteria::default()
        };
        let explanation = recommendation_explanation(&single, &criteria);

        assert!(explanation.contains("Found 1 item"));
        assert!(!explanation.contains("Found 1 items"));
        assert!(!explanation.contains("Price range"));
        assert_eq!(explanation, "Found 1 item. in dress. • All items have excellent ratings.");
    }

    #[test]
    fn test_explanation_min_price_and_rating() {
        let criteria = Criteria {
            price_min: Some(100.0),
            rating_min: Some(4.5),
            ..Criteria::default()
        };
        let explanation = recommendation_explanation(&sample_products(), &criteria);
        assert!(explanation.contains("over $100 with rating ≥ 4.5"));
    }
}
