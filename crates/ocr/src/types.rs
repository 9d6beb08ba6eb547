use serde::Serialize;

/// How a single trimmed receipt line was classified.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Likely names a purchased item.
    Product,
    /// Too short to carry anything useful (blank lines, OCR specks).
    Noise,
    /// Contains a decimal amount such as `12.99`.
    Price,
    /// Totals, payment method, store name, gratitude footer.
    Boilerplate,
}

impl LineKind {
    pub fn is_product(self) -> bool {
        matches!(self, LineKind::Product)
    }
}

impl std::fmt::Display for LineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineKind::Product => write!(f, "product"),
            LineKind::Noise => write!(f, "noise"),
            LineKind::Price => write!(f, "price"),
            LineKind::Boilerplate => write!(f, "boilerplate"),
        }
    }
}

/// Output of one receipt pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptScan {
    /// Raw OCR text output.
    pub ocr_text: String,
    /// Candidate product names, in receipt order. Duplicates are kept.
    pub products: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_kind_display() {
        assert_eq!(LineKind::Product.to_string(), "product");
        assert_eq!(LineKind::Boilerplate.to_string(), "boilerplate");
    }

    #[test]
    fn line_kind_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&LineKind::Price).unwrap(), "\"price\"");
    }

    #[test]
    fn only_product_is_product() {
        assert!(LineKind::Product.is_product());
        assert!(!LineKind::Noise.is_product());
        assert!(!LineKind::Price.is_product());
        assert!(!LineKind::Boilerplate.is_product());
    }
}
