use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::executor::RunStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRanking {
    pub product_id: String,
    pub product_title: String,
    pub review_count: u64,
    // Empty unless per-product word tracking was enabled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_words: Vec<WordCount>,
}

/// Top-K words plus how many distinct words were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordReport {
    pub entries: Vec<WordCount>,
    pub remaining: usize,
}

/// Top-K products by review count plus how many products were left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductReport {
    pub entries: Vec<ProductRanking>,
    pub remaining: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub total_reviews: u64,
    pub stats: RunStats,
    pub words: WordReport,
    pub products: ProductReport,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for WordReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for entry in &self.entries {
            writeln!(f, "  {}:  {},", entry.word, entry.count)?;
        }
        writeln!(f, "  ...{} more", self.remaining)?;
        write!(f, "]")
    }
}

impl fmt::Display for ProductReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for entry in &self.entries {
            writeln!(f, "  {}:", entry.product_id)?;
            writeln!(f, "  product_title:  {},", entry.product_title)?;
            writeln!(f, "  size:  {},", entry.review_count)?;
            if !entry.top_words.is_empty() {
                let words: Vec<String> = entry
                    .top_words
                    .iter()
                    .map(|w| format!("{}: {}", w.word, w.count))
                    .collect();
                writeln!(f, "  top_words:  [{}],", words.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  ...{} more", self.remaining)?;
        write!(f, "]")
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "There are: {} reviews", self.total_reviews)?;
        writeln!(
            f,
            "These are the {} most frequent words found across all products:",
            self.words.entries.len()
        )?;
        writeln!(f, "{}", self.words)?;
        writeln!(
            f,
            "These are the {} most reviewed products:",
            self.products.entries.len()
        )?;
        write!(f, "{}", self.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            total_reviews: 5,
            stats: RunStats::default(),
            words: WordReport {
                entries: vec![
                    WordCount {
                        word: "great".into(),
                        count: 3,
                    },
                    WordCount {
                        word: "sound".into(),
                        count: 2,
                    },
                ],
                remaining: 4,
            },
            products: ProductReport {
                entries: vec![ProductRanking {
                    product_id: "P1".into(),
                    product_title: "HDMI Cable".into(),
                    review_count: 3,
                    top_words: Vec::new(),
                }],
                remaining: 0,
            },
        }
    }

    #[test]
    fn test_word_report_text() {
        let text = sample_report().words.to_string();
        assert_eq!(text, "[\n  great:  3,\n  sound:  2,\n  ...4 more\n]");
    }

    #[test]
    fn test_product_report_text() {
        let text = sample_report().products.to_string();
        assert!(text.contains("  P1:\n  product_title:  HDMI Cable,\n  size:  3,\n"));
        assert!(text.ends_with("  ...0 more\n]"));
        assert!(!text.contains("top_words"));
    }

    #[test]
    fn test_analysis_report_text_and_json() {
        let report = sample_report();
        let text = report.to_string();
        assert!(text.starts_with("There are: 5 reviews\n"));
        assert!(text.contains("These are the 2 most frequent words"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["total_reviews"], 5);
        assert_eq!(json["words"]["entries"][0]["word"], "great");
        assert_eq!(json["products"]["entries"][0]["review_count"], 3);
        assert!(json["products"]["entries"][0].get("top_words").is_none());
    }
}
