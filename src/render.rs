//! Terminal rendering of search results and inventory stats

use colored::Colorize;

use crate::catalog::{CatalogStats, Product};
use crate::recommender::SearchOutcome;

const DESCRIPTION_WIDTH: usize = 40;

/// How `search` prints its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Product cards
    Text,
    /// Compact table
    Table,
    /// Machine-readable outcome
    Json,
}

pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn stars(rating: f64) -> String {
    "★".repeat(rating.max(0.0).floor() as usize)
}

fn plural(n: usize) -> &'static str {
    if n != 1 {
        "s"
    } else {
        ""
    }
}

pub fn product_card(p: &Product) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", p.name.bold()));
    out.push_str(&format!("  Category: {}\n", title_case(&p.category)));
    out.push_str(&format!("  Color:    {}\n", title_case(&p.color)));
    out.push_str(&format!("  Price:    {}\n", format!("${:.2}", p.price).red().bold()));
    out.push_str(&format!("  Rating:   {} ({}/5)\n", stars(p.rating).yellow(), p.rating));
    out.push_str(&format!("  {}\n", p.description.italic()));
    out.push_str(&format!("  {}\n", p.image_url.dimmed()));
    out
}

pub fn results_header(count: usize) -> String {
    format!("Found {} Product{}", count, plural(count))
}

/// Fixed-width table: name, category, color, price, rating, description
pub fn results_table(products: &[Product]) -> String {
    let name_width = products
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = format!(
        "{:<nw$}  {:<8}  {:<8}  {:>8}  {:>6}  {}\n",
        "Name",
        "Category",
        "Color",
        "Price",
        "Rating",
        "Description",
        nw = name_width
    );
    out.push_str(&format!("{}\n", "-".repeat(name_width + 44 + DESCRIPTION_WIDTH)));

    for p in products {
        out.push_str(&format!(
            "{:<nw$}  {:<8}  {:<8}  {:>8}  {:>6.1}  {}\n",
            p.name,
            p.category,
            p.color,
            format!("${:.2}", p.price),
            p.rating,
            truncate(&p.description, DESCRIPTION_WIDTH),
            nw = name_width
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

pub fn empty_results() -> String {
    format!(
        "{}\n\nSuggestions:\n  - Try broader search terms\n  - Check the available categories and colors (`saleseer stats`)\n  - Adjust your price range\n",
        "No products found matching your criteria. Try adjusting your search terms.".yellow()
    )
}

pub fn inventory_overview(stats: &CatalogStats) -> String {
    let mut categories: Vec<String> = stats.categories.iter().map(|c| title_case(c)).collect();
    categories.sort();
    let mut colors: Vec<String> = stats.colors.iter().map(|c| title_case(c)).collect();
    colors.sort();

    let mut out = format!("{}\n", "Inventory Overview".bold());
    out.push_str(&format!("  Total Products: {}\n", stats.total_products.to_string().cyan()));
    out.push_str(&format!("  Average Rating: {:.1}/5\n", stats.avg_rating));
    out.push_str(&format!(
        "  Price Range:    ${:.0} - ${:.0}\n",
        stats.price_range.min, stats.price_range.max
    ));
    out.push_str(&format!("\n{}\n", "Available Categories".bold()));
    for c in &categories {
        out.push_str(&format!("  • {}\n", c));
    }
    out.push_str(&format!("\n{}\n", "Available Colors".bold()));
    for c in &colors {
        out.push_str(&format!("  • {}\n", c));
    }
    out
}

/// Full human-readable report for one query
pub fn search_report(outcome: &SearchOutcome, format: OutputFormat, limit: Option<usize>) -> String {
    let shown = &outcome.products[..limit.unwrap_or(usize::MAX).min(outcome.products.len())];

    let mut out = format!("{}\n", outcome.summary.blue().bold());
    out.push_str(&format!("{} {}\n\n", "Recommendation Insight:".green().bold(), outcome.explanation));

    if outcome.products.is_empty() {
        out.push_str(&empty_results());
        return out;
    }

    out.push_str(&format!("{}\n\n", results_header(outcome.products.len()).bold()));
    match format {
        OutputFormat::Table => out.push_str(&results_table(shown)),
        _ => {
            for p in shown {
                out.push_str(&product_card(p));
                out.push('\n');
            }
        }
    }
    if shown.len() < outcome.products.len() {
        out.push_str(&format!("… and {} more\n", outcome.products.len() - shown.len()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{sample_products, Catalog};
    use crate::extractor::CriteriaExtractor;
    use crate::recommender::Recommender;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dress"), "Dress");
        assert_eq!(title_case("navy blue"), "Navy Blue");
        assert_eq!(title_case("LIGHT grey"), "Light Grey");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4.8), "★★★★");
        assert_eq!(stars(5.0), "★★★★★");
        assert_eq!(stars(0.5), "");
    }

    #[test]
    fn test_product_card() {
        plain();
        let card = product_card(&sample_products()[0]);
        assert!(card.contains("Red Dress"));
        assert!(card.contains("Category: Dress"));
        assert!(card.contains("Color:    Red"));
        assert!(card.contains("$150.00"));
        assert!(card.contains("★★★★ (4.5/5)"));
        assert!(card.contains("desc1"));
    }

    #[test]
    fn test_results_header_plural() {
        assert_eq!(results_header(1), "Found 1 Product");
        assert_eq!(results_header(3), "Found 3 Products");
    }

    #[test]
    fn test_results_table() {
        let table = results_table(&sample_products());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[3].contains("$89.99"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_inventory_overview() {
        plain();
        let stats = Catalog::from_products(sample_products()).unwrap().stats();
        let text = inventory_overview(&stats);
        assert!(text.contains("Total Products: 3"));
        assert!(text.contains("Average Rating: 4.5/5"));
        assert!(text.contains("Price Range:    $90 - $300"));
        let dress = text.find("• Dress").unwrap();
        let jacket = text.find("• Jacket").unwrap();
        assert!(dress < jacket);
    }

    #[test]
    fn test_search_report_empty() {
        plain();
        let recommender = Recommender::new(
            Catalog::from_products(sample_products()).unwrap(),
            CriteriaExtractor::offline(),
        );
        let outcome = recommender.search("purple sneakers");
        let report = search_report(&outcome, OutputFormat::Text, None);
        assert!(report.contains("No products found"));
        assert!(report.contains("Try broader search terms"));
    }

    #[test]
    fn test_search_report_limit() {
        plain();
        let recommender = Recommender::new(
            Catalog::from_products(sample_products()).unwrap(),
            CriteriaExtractor::offline(),
        );
        let outcome = recommender.search("anything at all");
        let report = search_report(&outcome, OutputFormat::Table, Some(1));
        assert!(report.contains("Found 3 Products"));
        assert!(report.contains("Black Jacket"));
        assert!(!report.contains("Blue Jeans"));
        assert!(report.contains("and 2 more"));
    }
}
