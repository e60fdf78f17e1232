//! Extraction accuracy checks
//!
//! Runs a fixed set of shopping queries through the criteria extractor and
//! compares the result with the expected fields.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::criteria::Criteria;
use crate::extractor::{CriteriaExtractor, ExtractionSource};

/// Numbers closer than this count as equal
const NUMBER_TOLERANCE: f64 = 0.01;

/// A single validation query and what it should extract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionCase {
    pub id: String,
    pub query: String,
    pub group: String,
    pub expected: Criteria,
}

/// Result of a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub case_id: String,
    pub query: String,
    pub passed: bool,
    pub source: String,
    pub extracted: Criteria,
    pub mismatches: Vec<String>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub passed: usize,
    pub accuracy: f32,
}

/// Validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub accuracy: f32,
    pub model_answers: usize,
    pub fallback_answers: usize,
    pub groups: HashMap<String, GroupStats>,
    pub test_results: Vec<CaseResult>,
    pub total_time_ms: u64,
}

/// Validation runner
pub struct Validator {
    cases: Vec<ExtractionCase>,
}

impl Validator {
    /// Create validator with the built-in cases
    pub fn new() -> Self {
        Self {
            cases: Self::builtin_cases(),
        }
    }

    pub fn with_cases(cases: Vec<ExtractionCase>) -> Self {
        Self { cases }
    }

    pub fn cases(&self) -> &[ExtractionCase] {
        &self.cases
    }

    fn builtin_cases() -> Vec<ExtractionCase> {
        let mut cases = Vec::new();
        let mut id = 0;

        let mut add = |group: &str, query: &str, expected: Criteria| {
            id += 1;
            cases.push(ExtractionCase {
                id: format!("EX{:03}", id),
                query: query.to_string(),
                group: group.to_string(),
                expected,
            });
        };

        // ==================== CATEGORY ====================
        add("category", "Show me red dresses under $200", fields(Some("dress"), Some("red"), None, Some(200.0), None));
        add("category", "I want blue jeans", fields(Some("jeans"), Some("blue"), None, None, None));
        add("category", "looking for an evening gown", fields(Some("dress"), None, None, None, None));
        add("category", "denim for the weekend", fields(Some("jeans"), None, None, None, None));
        add("category", "white sneakers", fields(Some("shoes"), Some("white"), None, None, None));
        add("category", "a navy blazer", fields(Some("jacket"), Some("navy"), None, None, None));
        add("category", "silk blouse in pink", fields(Some("shirt"), Some("pink"), None, None, None));

        // ==================== COLOR ====================
        add("color", "something green", fields(None, Some("green"), None, None, None));
        add("color", "gray jeans", fields(Some("jeans"), Some("grey"), None, None, None));
        add("color", "black boots", fields(Some("shoes"), Some("black"), None, None, None));

        // ==================== PRICE ====================
        add("price", "jackets under $150", fields(Some("jacket"), None, None, Some(150.0), None));
        add("price", "shoes over 100", fields(Some("shoes"), None, Some(100.0), None, None));
        add("price", "dresses between $50 and $120", fields(Some("dress"), None, Some(50.0), Some(120.0), None));
        add("price", "shirts for less than 40", fields(Some("shirt"), None, None, Some(40.0), None));
        add("price", "Something cheap", fields(None, None, None, Some(50.0), None));
        add("price", "coat 250", fields(Some("jacket"), None, None, Some(250.0), None));
        add("price", "budget friendly jeans", fields(Some("jeans"), None, None, Some(50.0), None));

        // ==================== RATING ====================
        add("rating", "Find shoes with good ratings", fields(Some("shoes"), None, None, None, Some(4.0)));
        add("rating", "top rated jackets", fields(Some("jacket"), None, None, None, Some(4.0)));
        add("rating", "dresses with 4.5 stars", fields(Some("dress"), None, None, None, Some(4.5)));

        // ==================== COMBINED ====================
        add("combined", "highly rated black coat under 300", fields(Some("jacket"), Some("black"), None, Some(300.0), Some(4.0)));
        add("combined", "red running shoes under $130 rated 4", fields(Some("shoes"), Some("red"), None, Some(130.0), Some(4.0)));
        add("combined", "blue striped shirt between 30 and 60", fields(Some("shirt"), Some("blue"), Some(30.0), Some(60.0), None));

        // ==================== NO CRITERIA ====================
        add("empty", "surprise me", Criteria::default());
        add("empty", "what's new?", Criteria::default());

        cases
    }

    /// Run every case through `extractor`
    pub fn run(&self, extractor: &CriteriaExtractor) -> ValidationReport {
        let start_time = Instant::now();
        let mut results = Vec::new();
        let mut groups: HashMap<String, GroupStats> = HashMap::new();
        let total = self.cases.len();

        println!("\n{}", "═".repeat(60).bright_blue());
        println!("{}", "  SALESEER EXTRACTION VALIDATION".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!("\nRunning {} cases...\n", total.to_string().cyan());

        for (i, case) in self.cases.iter().enumerate() {
            let case_start = Instant::now();
            let extraction = extractor.extract(&case.query);
            let mismatches = compare(&case.expected, &extraction.criteria);
            let passed = mismatches.is_empty();

            let group = groups.entry(case.group.clone()).or_default();
            group.total += 1;
            if passed {
                group.passed += 1;
            }

            let status = if passed { "✓".green() } else { "✗".red() };
            println!(
                "[{}/{}] {} {} - {} ({})",
                (i + 1).to_string().cyan(),
                total,
                status,
                case.id.yellow(),
                if passed { case.query.green() } else { case.query.red() },
                extraction.source.as_str()
            );
            for m in &mismatches {
                println!("        {} {}", "→".yellow(), m);
            }

            results.push(CaseResult {
                case_id: case.id.clone(),
                query: case.query.clone(),
                passed,
                source: extraction.source.as_str().to_string(),
                extracted: extraction.criteria,
                mismatches,
                execution_time_ms: case_start.elapsed().as_millis() as u64,
            });
        }

        let passed = results.iter().filter(|r| r.passed).count();
        let accuracy = if total == 0 {
            0.0
        } else {
            (passed as f32 / total as f32) * 100.0
        };
        for stats in groups.values_mut() {
            stats.accuracy = (stats.passed as f32 / stats.total as f32) * 100.0;
        }
        let model_answers = results
            .iter()
            .filter(|r| r.source == ExtractionSource::Model.as_str())
            .count();

        let report = ValidationReport {
            total_tests: total,
            passed,
            failed: total - passed,
            accuracy,
            model_answers,
            fallback_answers: total - model_answers,
            groups,
            test_results: results,
            total_time_ms: start_time.elapsed().as_millis() as u64,
        };

        self.print_summary(&report);
        report
    }

    fn print_summary(&self, report: &ValidationReport) {
        println!("\n{}", "═".repeat(60).bright_blue());
        println!("{}", "  VALIDATION SUMMARY".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());

        let accuracy = format!("{:.1}", report.accuracy);
        let accuracy_color = if report.accuracy >= 90.0 {
            accuracy.bright_green()
        } else if report.accuracy >= 70.0 {
            accuracy.yellow()
        } else {
            accuracy.red()
        };

        println!("\n{}", "Overall Results:".bold());
        println!("  Total Cases:     {}", report.total_tests.to_string().cyan());
        println!("  Passed:          {}", report.passed.to_string().green());
        println!("  Failed:          {}", report.failed.to_string().red());
        println!("  Accuracy:        {}%", accuracy_color);
        println!(
            "  Answered by:     {} model / {} fallback",
            report.model_answers, report.fallback_answers
        );
        println!("  Total Time:      {} ms", report.total_time_ms.to_string().cyan());

        println!("\n{}", "Group Breakdown:".bold());
        let mut sorted: Vec<_> = report.groups.iter().collect();
        sorted.sort_by(|a, b| b.1.accuracy.total_cmp(&a.1.accuracy).then_with(|| a.0.cmp(b.0)));
        for (group, stats) in sorted {
            println!(
                "  {:12} {}/{} cases  ({:.1}%)",
                group.cyan(),
                stats.passed,
                stats.total,
                stats.accuracy
            );
        }

        let failed: Vec<_> = report.test_results.iter().filter(|r| !r.passed).collect();
        if !failed.is_empty() {
            println!("\n{}", "Failed Cases:".bold());
            for r in failed {
                println!("  {} {} - {}", "✗".red(), r.case_id.yellow(), r.query);
            }
        }

        println!("\n{}", "═".repeat(60).bright_blue());
    }

    /// Save report to JSON file
    pub fn save_report(&self, report: &ValidationReport, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).context("Failed to write validation report")?;
        println!("\nReport saved to: {}", path.display().to_string().cyan());
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn fields(
    category: Option<&str>,
    color: Option<&str>,
    price_min: Option<f64>,
    price_max: Option<f64>,
    rating_min: Option<f64>,
) -> Criteria {
    Criteria {
        category: category.map(str::to_string),
        color: color.map(str::to_string),
        price_max,
        price_min,
        rating_min,
    }
}

/// Field-by-field differences; empty means the extraction is acceptable.
///
/// Categories match when either contains the other ("shoe" vs "shoes"), the
/// same way the product filter treats them.
fn compare(expected: &Criteria, actual: &Criteria) -> Vec<String> {
    let mut mismatches = Vec::new();

    let text_ok = |e: &Option<String>, a: &Option<String>, loose: bool| match (e, a) {
        (None, None) => true,
        (Some(e), Some(a)) => {
            let (e, a) = (e.to_lowercase(), a.to_lowercase());
            e == a || (loose && (e.contains(&a) || a.contains(&e)))
        }
        _ => false,
    };
    let number_ok = |e: Option<f64>, a: Option<f64>| match (e, a) {
        (None, None) => true,
        (Some(e), Some(a)) => (e - a).abs() < NUMBER_TOLERANCE,
        _ => false,
    };

    if !text_ok(&expected.category, &actual.category, true) {
        mismatches.push(format!("category: expected {:?}, got {:?}", expected.category, actual.category));
    }
    if !text_ok(&expected.color, &actual.color, false) {
        mismatches.push(format!("color: expected {:?}, got {:?}", expected.color, actual.color));
    }
    if !number_ok(expected.price_max, actual.price_max) {
        mismatches.push(format!("price_max: expected {:?}, got {:?}", expected.price_max, actual.price_max));
    }
    if !number_ok(expected.price_min, actual.price_min) {
        mismatches.push(format!("price_min: expected {:?}, got {:?}", expected.price_min, actual.price_min));
    }
    if !number_ok(expected.rating_min, actual.rating_min) {
        mismatches.push(format!("rating_min: expected {:?}, got {:?}", expected.rating_min, actual.rating_min));
    }

    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_case_ids_are_unique() {
        let validator = Validator::new();
        let mut ids: Vec<&str> = validator.cases().iter().map(|c| c.id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_compare_loose_category() {
        let expected = fields(Some("shoes"), None, None, None, Some(4.0));
        let actual = fields(Some("Shoe"), None, None, None, Some(4.004));
        assert!(compare(&expected, &actual).is_empty());
    }

    #[test]
    fn test_compare_reports_each_field() {
        let expected = fields(Some("dress"), Some("red"), None, Some(200.0), None);
        let actual = fields(Some("jacket"), None, Some(10.0), Some(200.0), None);
        let mismatches = compare(&expected, &actual);
        assert_eq!(mismatches.len(), 3);
        assert!(mismatches[0].starts_with("category"));
        assert!(mismatches[1].starts_with("color"));
        assert!(mismatches[2].starts_with("price_min"));
    }

    #[test]
    fn test_offline_run_passes_builtin_cases() {
        let report = Validator::new().run(&CriteriaExtractor::offline());
        let failed: Vec<_> = report
            .test_results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| (r.query.clone(), r.mismatches.clone()))
            .collect();
        assert!(failed.is_empty(), "failed cases: {:?}", failed);
        assert_eq!(report.model_answers, 0);
        assert_eq!(report.fallback_answers, report.total_tests);
        assert_eq!(report.accuracy, 100.0);
    }

    #[test]
    fn test_failing_case_is_reported() {
        let validator = Validator::with_cases(vec![ExtractionCase {
            id: "X1".to_string(),
            query: "blue jeans".to_string(),
            group: "custom".to_string(),
            expected: fields(Some("dress"), Some("blue"), None, None, None),
        }]);
        let report = validator.run(&CriteriaExtractor::offline());
        assert_eq!(report.failed, 1);
        assert_eq!(report.groups["custom"].passed, 0);
    }

    #[test]
    fn test_save_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let validator = Validator::with_cases(Vec::new());
        let report = validator.run(&CriteriaExtractor::offline());
        validator.save_report(&report, &path).unwrap();

        let saved: ValidationReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.total_tests, 0);
    }
}
