use tracing::debug;

use crate::data_model::{Review, ReviewDraft};
use crate::error::{PipelineError, Result};
use crate::pipeline::schema::{Column, SCHEMA_COLUMNS};

/// Builds a [`Review`] from the positional fields of one data row.
///
/// Returns `Ok(None)` when any schema field is absent: the dataset has plenty of
/// truncated rows and those are skipped quietly. A present but non-numeric
/// integer field is an error for this row.
pub fn build_review(fields: &[Option<String>]) -> Result<Option<Review>> {
    if fields.len() < SCHEMA_COLUMNS {
        debug!(
            fields = fields.len(),
            required = SCHEMA_COLUMNS,
            "Row rejected: fewer fields than the schema"
        );
        return Ok(None);
    }
    if let Some(column) = Column::ALL.iter().find(|c| fields[c.index()].is_none()) {
        debug!(column = column.name(), "Row rejected: missing field");
        return Ok(None);
    }

    let text = |column: Column| fields[column.index()].clone().unwrap_or_default();
    let flag = |column: Column| {
        fields[column.index()]
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("y"))
    };

    let draft = ReviewDraft {
        marketplace: text(Column::Marketplace),
        customer_id: text(Column::CustomerId),
        review_id: text(Column::ReviewId),
        product_id: text(Column::ProductId),
        product_parent: text(Column::ProductParent),
        product_title: text(Column::ProductTitle),
        product_category: text(Column::ProductCategory),
        star_rating: parse_int(fields, Column::StarRating)?,
        helpful_votes: parse_int(fields, Column::HelpfulVotes)?,
        total_votes: parse_int(fields, Column::TotalVotes)?,
        vine: flag(Column::Vine),
        verified_purchase: flag(Column::VerifiedPurchase),
        review_headline: text(Column::ReviewHeadline),
        review_body: text(Column::ReviewBody),
        review_date: text(Column::ReviewDate),
    };
    Ok(Some(draft.build()))
}

fn parse_int(fields: &[Option<String>], column: Column) -> Result<i32> {
    let value = fields[column.index()].as_deref().unwrap_or_default();
    value.parse::<i32>().map_err(|_| PipelineError::NumericField {
        column: column.name(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> Vec<Option<String>> {
        [
            "US",
            "12345",
            "R1ABC",
            "B003L1ZYYM",
            "555",
            "HDMI Cable",
            "Electronics",
            "5",
            "2",
            "3",
            "N",
            "y",
            "Great cable",
            "Works great, sound is fine.",
            "2015-08-31",
        ]
        .iter()
        .map(|s| Some(s.to_string()))
        .collect()
    }

    #[test]
    fn test_builds_complete_row() {
        let review = build_review(&sample_fields()).unwrap().unwrap();
        assert_eq!(review.marketplace(), "US");
        assert_eq!(review.review_id(), "R1ABC");
        assert_eq!(review.product_id(), "B003L1ZYYM");
        assert_eq!(review.product_title(), "HDMI Cable");
        assert_eq!(review.star_rating(), 5);
        assert_eq!(review.helpful_votes(), 2);
        assert_eq!(review.total_votes(), 3);
        assert!(!review.vine());
        assert!(review.verified_purchase());
        assert_eq!(review.review_date(), "2015-08-31");
        assert!(!review.has_cleaned_words());
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build_review(&sample_fields()).unwrap().unwrap();
        let b = build_review(&sample_fields()).unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.review_body(), b.review_body());
        assert_eq!(a.star_rating(), b.star_rating());
    }

    #[test]
    fn test_missing_field_rejects_silently() {
        let mut fields = sample_fields();
        fields[Column::ReviewDate.index()] = None;
        assert!(build_review(&fields).unwrap().is_none());

        let mut fields = sample_fields();
        fields[Column::Marketplace.index()] = None;
        assert!(build_review(&fields).unwrap().is_none());

        assert!(build_review(&sample_fields()[..10]).unwrap().is_none());
    }

    #[test]
    fn test_non_numeric_rating_is_an_error() {
        let mut fields = sample_fields();
        fields[Column::StarRating.index()] = Some("five".to_string());
        match build_review(&fields) {
            Err(PipelineError::NumericField { column, value }) => {
                assert_eq!(column, "star_rating");
                assert_eq!(value, "five");
            }
            other => panic!("Expected NumericField error, got {:?}", other),
        }

        let mut fields = sample_fields();
        fields[Column::TotalVotes.index()] = Some(String::new());
        assert!(matches!(
            build_review(&fields),
            Err(PipelineError::NumericField {
                column: "total_votes",
                ..
            })
        ));
    }

    #[test]
    fn test_flags_only_accept_y() {
        let mut fields = sample_fields();
        fields[Column::Vine.index()] = Some("Y".to_string());
        fields[Column::VerifiedPurchase.index()] = Some("yes".to_string());
        let review = build_review(&fields).unwrap().unwrap();
        assert!(review.vine());
        assert!(!review.verified_purchase());

        fields[Column::Vine.index()] = Some(String::new());
        let review = build_review(&fields).unwrap().unwrap();
        assert!(!review.vine());
    }

    #[test]
    fn test_builder_keeps_out_of_range_values() {
        let mut fields = sample_fields();
        fields[Column::StarRating.index()] = Some("9".to_string());
        fields[Column::HelpfulVotes.index()] = Some("-1".to_string());
        let review = build_review(&fields).unwrap().unwrap();
        assert_eq!(review.star_rating(), 9);
        assert_eq!(review.helpful_votes(), -1);
    }

    #[test]
    fn test_extra_header_columns_are_ignored() {
        let mut fields = sample_fields();
        fields.push(Some("extra".to_string()));
        let review = build_review(&fields).unwrap().unwrap();
        assert_eq!(review.review_date(), "2015-08-31");
    }
}
