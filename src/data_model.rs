use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One customer review, built from a single data row.
///
/// Fields are read-only after construction. The only mutations are the guarded
/// vote/rating setters and the one-time attachment of cleaned words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    marketplace: String,
    customer_id: String,
    review_id: String,
    product_id: String,
    product_parent: String,
    product_title: String,
    product_category: String,
    star_rating: i32,
    helpful_votes: i32,
    total_votes: i32,
    vine: bool,
    verified_purchase: bool,
    review_headline: String,
    review_body: String,
    review_date: String,
    cleaned_words: Option<Vec<String>>,
}

/// Named fields for a [`Review`], finished with a single [`ReviewDraft::build`] call.
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub marketplace: String,
    pub customer_id: String,
    pub review_id: String,
    pub product_id: String,
    pub product_parent: String,
    pub product_title: String,
    pub product_category: String,
    pub star_rating: i32,
    pub helpful_votes: i32,
    pub total_votes: i32,
    pub vine: bool,
    pub verified_purchase: bool,
    pub review_headline: String,
    pub review_body: String,
    pub review_date: String,
}

impl ReviewDraft {
    pub fn build(self) -> Review {
        Review {
            marketplace: self.marketplace,
            customer_id: self.customer_id,
            review_id: self.review_id,
            product_id: self.product_id,
            product_parent: self.product_parent,
            product_title: self.product_title,
            product_category: self.product_category,
            star_rating: self.star_rating,
            helpful_votes: self.helpful_votes,
            total_votes: self.total_votes,
            vine: self.vine,
            verified_purchase: self.verified_purchase,
            review_headline: self.review_headline,
            review_body: self.review_body,
            review_date: self.review_date,
            cleaned_words: None,
        }
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    fold_case(a).cmp(fold_case(b))
}

impl Review {
    pub fn marketplace(&self) -> &str {
        &self.marketplace
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn review_id(&self) -> &str {
        &self.review_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn product_parent(&self) -> &str {
        &self.product_parent
    }

    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    pub fn product_category(&self) -> &str {
        &self.product_category
    }

    pub fn star_rating(&self) -> i32 {
        self.star_rating
    }

    pub fn helpful_votes(&self) -> i32 {
        self.helpful_votes
    }

    pub fn total_votes(&self) -> i32 {
        self.total_votes
    }

    pub fn vine(&self) -> bool {
        self.vine
    }

    pub fn verified_purchase(&self) -> bool {
        self.verified_purchase
    }

    pub fn review_headline(&self) -> &str {
        &self.review_headline
    }

    pub fn review_body(&self) -> &str {
        &self.review_body
    }

    pub fn review_date(&self) -> &str {
        &self.review_date
    }

    /// Tokens of the review body; empty until the review has been ingested.
    pub fn cleaned_words(&self) -> &[String] {
        self.cleaned_words.as_deref().unwrap_or(&[])
    }

    pub fn has_cleaned_words(&self) -> bool {
        self.cleaned_words.is_some()
    }

    /// Ignored unless `rating` is within 1..=5.
    pub fn set_star_rating(&mut self, rating: i32) {
        if (1..=5).contains(&rating) {
            self.star_rating = rating;
        }
    }

    /// Ignored unless `votes` is positive.
    pub fn set_helpful_votes(&mut self, votes: i32) {
        if votes > 0 {
            self.helpful_votes = votes;
        }
    }

    /// Ignored unless `votes` is positive.
    pub fn set_total_votes(&mut self, votes: i32) {
        if votes > 0 {
            self.total_votes = votes;
        }
    }

    /// An empty token list leaves the review untouched.
    pub fn attach_cleaned_words(&mut self, words: Vec<String>) {
        if !words.is_empty() {
            self.cleaned_words = Some(words);
        }
    }

    /// Orders by review id, then product id, both case-insensitively.
    ///
    /// Not exposed as `Ord`: equality only looks at the review id, so two reviews
    /// can be equal while this comparison still separates them by product.
    pub fn compare(&self, other: &Review) -> Ordering {
        cmp_ignore_case(&self.review_id, &other.review_id)
            .then_with(|| cmp_ignore_case(&self.product_id, &other.product_id))
    }
}

impl PartialEq for Review {
    fn eq(&self, other: &Self) -> bool {
        cmp_ignore_case(&self.review_id, &other.review_id) == Ordering::Equal
    }
}

impl Eq for Review {}

impl Hash for Review {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in fold_case(&self.review_id) {
            c.hash(state);
        }
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "\tproduct_title: {}", self.product_title)?;
        writeln!(f, "\treview_id: {}", self.review_id)?;
        writeln!(f, "\tproduct_id: {}", self.product_id)?;
        writeln!(f, "\treview_body: {}", self.review_body)?;
        writeln!(f, "\tclean_review_body: {:?}", self.cleaned_words())?;
        write!(f, "}}")
    }
}

/// Per-product grouping of distinct review ids, in first-seen order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductAggregate {
    review_ids: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
    // Only allocated when per-product word tracking is enabled for the run.
    word_counts: Option<HashMap<String, u64>>,
}

impl ProductAggregate {
    pub fn new(first_review_id: &str, track_words: bool) -> Self {
        let mut aggregate = ProductAggregate {
            review_ids: Vec::new(),
            seen: HashSet::new(),
            word_counts: track_words.then(HashMap::new),
        };
        aggregate.add_review_id(first_review_id);
        aggregate
    }

    /// Returns false if the id was already grouped under this product.
    pub fn add_review_id(&mut self, review_id: &str) -> bool {
        if self.seen.contains(review_id) {
            return false;
        }
        self.seen.insert(review_id.to_string());
        self.review_ids.push(review_id.to_string());
        true
    }

    pub fn add_words(&mut self, words: &[String]) {
        if let Some(counts) = self.word_counts.as_mut() {
            for word in words {
                *counts.entry(word.clone()).or_insert(0) += 1;
            }
        }
    }

    pub fn review_ids(&self) -> &[String] {
        &self.review_ids
    }

    pub fn review_count(&self) -> usize {
        self.review_ids.len()
    }

    pub fn first_review_id(&self) -> Option<&str> {
        self.review_ids.first().map(String::as_str)
    }

    pub fn word_counts(&self) -> Option<&HashMap<String, u64>> {
        self.word_counts.as_ref()
    }

    /// Appends ids from `other` that are not yet present and sums word counts.
    pub fn merge(&mut self, other: ProductAggregate) {
        for review_id in other.review_ids {
            self.add_review_id(&review_id);
        }
        match (self.word_counts.as_mut(), other.word_counts) {
            (Some(mine), Some(theirs)) => {
                for (word, count) in theirs {
                    *mine.entry(word).or_insert(0) += count;
                }
            }
            (None, Some(theirs)) => self.word_counts = Some(theirs),
            _ => {}
        }
    }
}
