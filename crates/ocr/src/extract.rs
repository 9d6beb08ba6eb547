use crate::classify::{KeywordClassifier, LineClassifier};
use crate::types::LineKind;

// ── Public extraction API ─────────────────────────────────────────────────────

/// Turns raw OCR text into candidate product names.
///
/// Lines are split on `'\n'` and trimmed, then handed to the classifier. Only
/// lines classified as [`LineKind::Product`] survive, in their original order.
/// Nothing is rewritten, merged or deduplicated.
pub struct ProductExtractor {
    classifier: Box<dyn LineClassifier>,
}

impl ProductExtractor {
    pub fn new(classifier: impl LineClassifier + 'static) -> Self {
        Self { classifier: Box::new(classifier) }
    }

    pub fn extract(&self, ocr_text: &str) -> Vec<String> {
        trimmed_lines(ocr_text)
            .filter(|line| self.classifier.classify(line).is_product())
            .map(str::to_string)
            .collect()
    }

    /// Every trimmed line with its classification, blank lines included.
    pub fn classify_lines<'a>(&self, ocr_text: &'a str) -> Vec<(&'a str, LineKind)> {
        trimmed_lines(ocr_text)
            .map(|line| (line, self.classifier.classify(line)))
            .collect()
    }
}

impl Default for ProductExtractor {
    fn default() -> Self {
        Self::new(KeywordClassifier::default())
    }
}

fn trimmed_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
