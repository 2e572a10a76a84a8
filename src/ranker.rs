use std::collections::HashMap;
use std::hash::Hash;

use itertools::Itertools;

use crate::aggregator::Aggregator;
use crate::report::{ProductRanking, ProductReport, WordCount, WordReport};

/// Full ranking, lowest count first. Equal counts are ordered by key ascending.
pub fn rank_ascending<K>(counts: &HashMap<K, u64>) -> Vec<(K, u64)>
where
    K: Ord + Hash + Clone,
{
    counts
        .iter()
        .map(|(key, count)| (key.clone(), *count))
        .sorted_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}

/// The `k` highest counts, highest first.
///
/// This is the ascending ranking read backwards, so among equal counts the
/// lexicographically last key comes first: `{b: 2, a: 2, c: 1}` with `k = 2`
/// gives `[(b, 2), (a, 2)]`.
pub fn top_k<K>(counts: &HashMap<K, u64>, k: usize) -> Vec<(K, u64)>
where
    K: Ord + Hash + Clone,
{
    let mut ranked = rank_ascending(counts);
    ranked.reverse();
    ranked.truncate(k);
    ranked
}

/// Most frequent words over all ingested review bodies.
pub fn most_frequent_words(aggregator: &Aggregator, k: usize) -> WordReport {
    let counts = aggregator.word_counts();
    let entries: Vec<WordCount> = top_k(counts, k)
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect();
    WordReport {
        remaining: counts.len().saturating_sub(entries.len()),
        entries,
    }
}

/// Products with the most distinct reviews.
///
/// When the aggregator tracked per-product words, each entry also carries the
/// product's own top `k` words.
pub fn most_reviewed_products(aggregator: &Aggregator, k: usize) -> ProductReport {
    let counts = aggregator.product_review_counts();
    let entries: Vec<ProductRanking> = top_k(&counts, k)
        .into_iter()
        .map(|(product_id, review_count)| {
            let top_words: Vec<WordCount> = aggregator
                .product(product_id)
                .and_then(|p| p.word_counts())
                .map(|words| {
                    top_k(words, k)
                        .into_iter()
                        .map(|(word, count)| WordCount { word, count })
                        .collect()
                })
                .unwrap_or_default();
            ProductRanking {
                product_id: product_id.to_string(),
                product_title: aggregator
                    .product_title(product_id)
                    .unwrap_or_default()
                    .to_string(),
                review_count,
                top_words,
            }
        })
        .collect();
    ProductReport {
        remaining: counts.len().saturating_sub(entries.len()),
        entries,
    }
}
