//! Keyword and number heuristics for criteria extraction without a model

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::criteria::Criteria;

/// Colors checked in order; the first hit wins
pub const COLORS: &[&str] = &[
    "red", "blue", "green", "black", "white", "pink", "yellow", "purple", "orange", "brown",
    "grey", "gray", "navy",
];

/// Canonical category and the word stems that select it
pub const CATEGORIES: &[(&str, &[&str])] = &[
    ("dress", &["dress", "gown"]),
    ("jeans", &["jean", "denim"]),
    ("shirt", &["shirt", "blouse", "top"]),
    ("shoes", &["shoe", "sneaker", "boot"]),
    ("jacket", &["jacket", "blazer", "coat", "overcoat", "raincoat", "topcoat"]),
];

/// Price ceiling implied by "cheap" and friends
pub const CHEAP_PRICE_MAX: f64 = 50.0;

/// Rating floor implied by "good ratings", "top rated", ...
pub const GOOD_RATING_MIN: f64 = 4.0;

/// A price or rating, with optional thousands separators and decimals
const NUM: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";

/// Local, non-AI criteria parser
pub struct KeywordParser {
    colors: Vec<(&'static str, Regex)>,
    categories: Vec<(&'static str, Vec<Regex>)>,
    star_re: Regex,
    rated_re: Regex,
    quality_re: Regex,
    between_re: Regex,
    span_re: Regex,
    number_re: Regex,
    max_re: Regex,
    min_re: Regex,
    cheap_re: Regex,
}

impl KeywordParser {
    pub fn new() -> Self {
        let colors = COLORS
            .iter()
            .map(|&c| (c, Regex::new(&format!(r"\b{}\b", regex::escape(c))).unwrap()))
            .collect();

        let categories = CATEGORIES
            .iter()
            .map(|&(category, stems)| {
                let patterns = stems
                    .iter()
                    .map(|s| Regex::new(&format!(r"\b{}(?:s|es)?\b", regex::escape(s))).unwrap())
                    .collect();
                (category, patterns)
            })
            .collect();

        Self {
            colors,
            categories,
            star_re: Regex::new(&format!(r"{}\s*\+?[\s-]*stars?\b", NUM)).unwrap(),
            rated_re: Regex::new(&format!(r"\brated\s+(?:at\s+least\s+)?{}", NUM)).unwrap(),
            quality_re: Regex::new(
                r"\b(?:good|great|high|excellent)\s+ratings?\b|\b(?:highly|top|best|well)[\s-]rated\b|\bwell[\s-]reviewed\b",
            )
            .unwrap(),
            between_re: Regex::new(&format!(r"\bbetween\s+\$?{}\s+and\s+\$?{}", NUM, NUM)).unwrap(),
            span_re: Regex::new(&format!(r"\$?{}\s*(?:-|to)\s*\$?{}", NUM, NUM)).unwrap(),
            number_re: Regex::new(&format!(r"\$?{}", NUM)).unwrap(),
            max_re: Regex::new(&format!(
                r"\b(?:under|below|less than|cheaper than|no more than|up to|at most|max(?:imum)?|within)\b\s*(?:of\s+)?\$?\s*{}",
                NUM
            ))
            .unwrap(),
            min_re: Regex::new(&format!(
                r"\b(?:over|above|more than|at least|min(?:imum)?|starting at)\b\s*(?:of\s+)?\$?\s*{}",
                NUM
            ))
            .unwrap(),
            cheap_re: Regex::new(r"\b(?:cheap|budget|affordable|inexpensive)\b").unwrap(),
        }
    }

    /// Extract whatever criteria the query's wording makes obvious
    pub fn parse(&self, query: &str) -> Criteria {
        let text = query.nfkc().collect::<String>().to_lowercase();
        let mut criteria = Criteria::default();

        // Ratings go first so "4 stars" is not a price and "top rated" is not a shirt
        let explicit = self
            .star_re
            .captures(&text)
            .or_else(|| self.rated_re.captures(&text))
            .and_then(|caps| number(&caps[1]))
            .filter(|r| *r > 0.0);
        let mut rest = self.star_re.replace_all(&text, " ").into_owned();
        rest = self.rated_re.replace_all(&rest, " ").into_owned();
        let implied = self.quality_re.is_match(&rest).then_some(GOOD_RATING_MIN);
        rest = self.quality_re.replace_all(&rest, " ").into_owned();
        criteria.rating_min = explicit.map(|r| r.min(5.0)).or(implied);

        criteria.color = self
            .colors
            .iter()
            .find(|(_, re)| re.is_match(&rest))
            .map(|(color, _)| canonical_color(color).to_string());

        criteria.category = self
            .categories
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&rest)))
            .map(|(category, _)| category.to_string());

        self.parse_price(&rest, &mut criteria);

        tracing::debug!(?criteria, "Fallback parse of {:?}", query);
        criteria.normalized()
    }

    fn parse_price(&self, text: &str, criteria: &mut Criteria) {
        let bounds = self
            .between_re
            .captures(text)
            .or_else(|| self.span_re.captures(text))
            .and_then(|caps| Some((number(&caps[1])?, number(&caps[2])?)));

        if let Some((a, b)) = bounds {
            criteria.price_min = Some(a.min(b)).filter(|v| *v > 0.0);
            criteria.price_max = Some(a.max(b)).filter(|v| *v > 0.0);
            return;
        }

        // Each keyword binds the number right after it; "no more than" is
        // consumed as a ceiling before floors are looked for
        let max = self
            .max_re
            .captures(text)
            .and_then(|caps| number(&caps[1]))
            .filter(|v| *v > 0.0);
        let rest = self.max_re.replace_all(text, " ");
        let min = self
            .min_re
            .captures(&rest)
            .and_then(|caps| number(&caps[1]))
            .filter(|v| *v > 0.0);

        if max.is_some() || min.is_some() {
            criteria.price_max = max;
            criteria.price_min = min;
            return;
        }

        let price = self
            .number_re
            .captures(text)
            .and_then(|caps| number(&caps[1]))
            .filter(|v| *v > 0.0);

        match price {
            Some(price) => criteria.price_max = Some(price),
            None if self.cheap_re.is_match(text) => criteria.price_max = Some(CHEAP_PRICE_MAX),
            None => {}
        }
    }
}

impl Default for KeywordParser {
    fn default() -> Self {
        Self::new()
    }
}

fn number(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse().ok()
}

fn canonical_color(color: &str) -> &str {
    match color {
        "gray" => "grey",
        other => other,
    }
}
