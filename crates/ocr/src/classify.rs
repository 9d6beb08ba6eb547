use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;

use crate::types::LineKind;

/// ASCII digits only; Arabic-Indic and other Unicode digits are not prices.
pub const DEFAULT_PRICE_PATTERN: &str = r"[0-9]+\.[0-9]{2}";

pub const DEFAULT_NOISE_KEYWORDS: &[&str] = &[
    "total",
    "subtotal",
    "tax",
    "change",
    "cash",
    "visa",
    "mastercard",
    "debit",
    "walmart",
    "thank",
];

#[derive(Debug, Error)]
pub enum FilterConfigError {
    #[error("Invalid price pattern '{pattern}': {source}")]
    PricePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid noise keyword list: {0}")]
    Keywords(#[source] regex::Error),
}

/// Tunables for the receipt line filter.
///
/// The defaults reproduce the stock English heuristic; locale or retailer
/// variants can be supplied from configuration instead.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Lines with fewer characters than this (after trimming) are noise.
    pub min_line_chars: usize,
    /// A line matching this anywhere is treated as a price row.
    pub price_pattern: String,
    /// Case-insensitive substrings that mark boilerplate lines.
    pub noise_keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_line_chars: 3,
            price_pattern: DEFAULT_PRICE_PATTERN.to_string(),
            noise_keywords: DEFAULT_NOISE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Decides what a single trimmed receipt line is.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, line: &str) -> LineKind;
}

/// Regex-backed classifier built from a [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    min_line_chars: usize,
    price: Regex,
    /// `None` when the keyword list is empty.
    noise: Option<Regex>,
}

impl KeywordClassifier {
    pub fn new(config: &FilterConfig) -> Result<Self, FilterConfigError> {
        let price = Regex::new(&config.price_pattern).map_err(|source| {
            FilterConfigError::PricePattern { pattern: config.price_pattern.clone(), source }
        })?;

        let alternation = config
            .noise_keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(keyword_pattern)
            .collect::<Vec<_>>()
            .join("|");
        let noise = if alternation.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()
                    .map_err(FilterConfigError::Keywords)?,
            )
        };

        Ok(Self { min_line_chars: config.min_line_chars, price, noise })
    }
}

/// ASCII keywords fold ASCII case only, so `ſ` does not stand in for `s`.
/// Other keywords keep Unicode simple case folding (`ü` matches `Ü`).
fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    if keyword.is_ascii() {
        format!("(?-u:{escaped})")
    } else {
        escaped
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        // The stock patterns are known-valid literals.
        Self::new(&FilterConfig::default()).expect("default filter config compiles")
    }
}

impl LineClassifier for KeywordClassifier {
    fn classify(&self, line: &str) -> LineKind {
        if line.chars().count() < self.min_line_chars {
            return LineKind::Noise;
        }
        if self.price.is_match(line) {
            return LineKind::Price;
        }
        if self.noise.as_ref().is_some_and(|re| re.is_match(line)) {
            return LineKind::Boilerplate;
        }
        LineKind::Product
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> KeywordClassifier {
        KeywordClassifier::default()
    }

    // ── Length ────────────────────────────────────────────────────────────────

    #[test]
    fn two_chars_is_noise() {
        assert_eq!(stock().classify(""), LineKind::Noise);
        assert_eq!(stock().classify("ab"), LineKind::Noise);
        assert_eq!(stock().classify("abc"), LineKind::Product);
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // Two characters, four bytes.
        assert_eq!(stock().classify("éé"), LineKind::Noise);
    }

    // ── Price ─────────────────────────────────────────────────────────────────

    #[test]
    fn price_anywhere_in_line() {
        assert_eq!(stock().classify("12.99"), LineKind::Price);
        assert_eq!(stock().classify("BANANAS 1.29 F"), LineKind::Price);
        assert_eq!(stock().classify("$1,204.50"), LineKind::Price);
    }

    #[test]
    fn single_decimal_digit_is_not_price() {
        assert_eq!(stock().classify("Milk 2.5L"), LineKind::Product);
    }

    #[test]
    fn two_decimal_product_name_is_dropped() {
        // Known weakness: looks like a price, so it goes.
        assert_eq!(stock().classify("Cable 3.50mm adapter"), LineKind::Price);
    }

    // ── Keywords ──────────────────────────────────────────────────────────────

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(stock().classify("SUBTOTAL"), LineKind::Boilerplate);
        assert_eq!(stock().classify("Thank you for shopping"), LineKind::Boilerplate);
        assert_eq!(stock().classify("WalMart Supercenter"), LineKind::Boilerplate);
        assert_eq!(stock().classify("Paid by Visa"), LineKind::Boilerplate);
    }

    #[test]
    fn keywords_match_inside_words() {
        assert_eq!(stock().classify("Taxi toy car"), LineKind::Boilerplate);
        assert_eq!(stock().classify("Cashews"), LineKind::Boilerplate);
    }

    #[test]
    fn non_ascii_digits_are_not_prices() {
        assert_eq!(stock().classify("Tea ١٢.٣٤ pack"), LineKind::Product);
        assert_eq!(stock().classify("Rice ４.５０ bag"), LineKind::Product);
    }

    #[test]
    fn ascii_keywords_do_not_fold_unicode_lookalikes() {
        assert_eq!(stock().classify("Caſh register toy"), LineKind::Product);
        // KELVIN SIGN, which Unicode folding would equate with `k` in "thank".
        assert_eq!(stock().classify("Than\u{212A} offering"), LineKind::Product);
        assert_eq!(stock().classify("CASH"), LineKind::Boilerplate);
    }

    #[test]
    fn non_ascii_keywords_fold_case() {
        let config = FilterConfig {
            noise_keywords: vec!["kühl".into()],
            ..FilterConfig::default()
        };
        let c = KeywordClassifier::new(&config).unwrap();
        assert_eq!(c.classify("KÜHLTASCHE"), LineKind::Boilerplate);
        assert_eq!(c.classify("Kuhmilch"), LineKind::Product);
    }

    #[test]
    fn price_wins_over_keyword() {
        assert_eq!(stock().classify("TOTAL 24.10"), LineKind::Price);
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    #[test]
    fn custom_keywords_replace_defaults() {
        let config = FilterConfig {
            noise_keywords: vec!["summe".into(), "danke".into()],
            ..FilterConfig::default()
        };
        let c = KeywordClassifier::new(&config).unwrap();
        assert_eq!(c.classify("SUMME"), LineKind::Boilerplate);
        assert_eq!(c.classify("Danke!"), LineKind::Boilerplate);
        assert_eq!(c.classify("Total"), LineKind::Product);
    }

    #[test]
    fn keywords_are_escaped() {
        let config = FilterConfig {
            noise_keywords: vec!["a.b".into()],
            ..FilterConfig::default()
        };
        let c = KeywordClassifier::new(&config).unwrap();
        assert_eq!(c.classify("xa.bx"), LineKind::Boilerplate);
        assert_eq!(c.classify("xaxbx"), LineKind::Product);
    }

    #[test]
    fn empty_keyword_list_keeps_everything_else() {
        let config = FilterConfig { noise_keywords: vec![], ..FilterConfig::default() };
        let c = KeywordClassifier::new(&config).unwrap();
        assert_eq!(c.classify("SUBTOTAL"), LineKind::Product);
        assert_eq!(c.classify("9.99"), LineKind::Price);
    }

    #[test]
    fn custom_price_pattern_for_comma_decimals() {
        let config = FilterConfig {
            price_pattern: r"\d+,\d{2}".into(),
            ..FilterConfig::default()
        };
        let c = KeywordClassifier::new(&config).unwrap();
        assert_eq!(c.classify("Brot 2,49"), LineKind::Price);
        assert_eq!(c.classify("Brot 2.49"), LineKind::Product);
    }

    #[test]
    fn invalid_price_pattern_is_rejected() {
        let config = FilterConfig { price_pattern: "(".into(), ..FilterConfig::default() };
        let err = KeywordClassifier::new(&config).unwrap_err();
        assert!(matches!(err, FilterConfigError::PricePattern { .. }));
    }

    #[test]
    fn filter_config_from_partial_toml() {
        let config: FilterConfig = toml::from_str("min_line_chars = 5").unwrap();
        assert_eq!(config.min_line_chars, 5);
        assert_eq!(config.price_pattern, DEFAULT_PRICE_PATTERN);
        assert_eq!(config.noise_keywords.len(), DEFAULT_NOISE_KEYWORDS.len());
    }
}
