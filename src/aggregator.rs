use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::data_model::{ProductAggregate, Review};
use crate::utils::text::Tokenizer;

#[derive(Debug, Clone)]
struct IndexedReview {
    sequence: u64,
    review: Review,
}

/// Running state of one analysis run: global word counts, per-product review
/// grouping and the review index keyed by review id.
///
/// Everything is kept in memory for the life of the run. Memory grows with the
/// number of reviews and distinct words.
#[derive(Debug, Clone)]
pub struct Aggregator {
    tokenizer: Tokenizer,
    track_product_words: bool,
    word_counts: HashMap<String, u64>,
    products: HashMap<String, ProductAggregate>,
    reviews: HashMap<String, IndexedReview>,
    rows_ingested: u64,
    next_sequence: u64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::new(Tokenizer::default(), false)
    }
}

impl Aggregator {
    pub fn new(tokenizer: Tokenizer, track_product_words: bool) -> Self {
        Aggregator {
            tokenizer,
            track_product_words,
            word_counts: HashMap::new(),
            products: HashMap::new(),
            reviews: HashMap::new(),
            rows_ingested: 0,
            next_sequence: 0,
        }
    }

    /// An empty aggregator sharing this one's settings.
    pub fn empty_like(&self) -> Self {
        Aggregator::new(self.tokenizer.clone(), self.track_product_words)
    }

    /// Tokenizes the review body, counts its words, groups the review under its
    /// product and stores it in the review index (overwriting any earlier review
    /// with the same id).
    pub fn ingest(&mut self, review: Review) {
        let sequence = self.next_sequence;
        self.ingest_at(sequence, review);
    }

    /// Like [`Aggregator::ingest`] with an explicit input position. Positions
    /// decide which review wins the index when shards are merged.
    pub fn ingest_at(&mut self, sequence: u64, mut review: Review) {
        let tokens = self.tokenizer.clean(Some(review.review_body()));

        for token in &tokens {
            *self.word_counts.entry(token.clone()).or_insert(0) += 1;
        }

        match self.products.entry(review.product_id().to_string()) {
            Entry::Occupied(mut occupied) => {
                let aggregate = occupied.get_mut();
                aggregate.add_review_id(review.review_id());
                aggregate.add_words(&tokens);
            }
            Entry::Vacant(vacant) => {
                let aggregate = vacant.insert(ProductAggregate::new(
                    review.review_id(),
                    self.track_product_words,
                ));
                aggregate.add_words(&tokens);
            }
        }

        review.attach_cleaned_words(tokens);
        self.reviews.insert(
            review.review_id().to_string(),
            IndexedReview { sequence, review },
        );
        self.rows_ingested += 1;
        self.next_sequence = self.next_sequence.max(sequence + 1);
    }

    /// Folds another aggregator into this one.
    ///
    /// Word counts add up, review-id groups are unioned (this side's order first)
    /// and for review ids present on both sides the later input position wins.
    pub fn merge(&mut self, other: Aggregator) {
        for (word, count) in other.word_counts {
            *self.word_counts.entry(word).or_insert(0) += count;
        }

        for (product_id, aggregate) in other.products {
            match self.products.entry(product_id) {
                Entry::Occupied(mut occupied) => occupied.get_mut().merge(aggregate),
                Entry::Vacant(vacant) => {
                    vacant.insert(aggregate);
                }
            }
        }

        for (review_id, indexed) in other.reviews {
            match self.reviews.entry(review_id) {
                Entry::Occupied(mut occupied) => {
                    if indexed.sequence > occupied.get().sequence {
                        occupied.insert(indexed);
                    }
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(indexed);
                }
            }
        }

        self.rows_ingested += other.rows_ingested;
        self.next_sequence = self.next_sequence.max(other.next_sequence);
    }

    pub fn word_counts(&self) -> &HashMap<String, u64> {
        &self.word_counts
    }

    pub fn products(&self) -> &HashMap<String, ProductAggregate> {
        &self.products
    }

    pub fn product(&self, product_id: &str) -> Option<&ProductAggregate> {
        self.products.get(product_id)
    }

    pub fn review(&self, review_id: &str) -> Option<&Review> {
        self.reviews.get(review_id).map(|indexed| &indexed.review)
    }

    /// Review counts per product, the input to the most-reviewed ranking.
    pub fn product_review_counts(&self) -> HashMap<&str, u64> {
        self.products
            .iter()
            .map(|(id, aggregate)| (id.as_str(), aggregate.review_count() as u64))
            .collect()
    }

    /// Title of the first review grouped under `product_id`, as currently stored
    /// in the review index.
    pub fn product_title(&self, product_id: &str) -> Option<&str> {
        let first = self.products.get(product_id)?.first_review_id()?;
        self.review(first).map(Review::product_title)
    }

    /// Number of ingested rows, duplicates included.
    pub fn total_reviews(&self) -> u64 {
        self.rows_ingested
    }

    pub fn distinct_words(&self) -> usize {
        self.word_counts.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn unique_reviews(&self) -> usize {
        self.reviews.len()
    }

    pub fn tracks_product_words(&self) -> bool {
        self.track_product_words
    }
}
