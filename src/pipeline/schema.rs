/// Column layout of the review dataset, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Marketplace,
    CustomerId,
    ReviewId,
    ProductId,
    ProductParent,
    ProductTitle,
    ProductCategory,
    StarRating,
    HelpfulVotes,
    TotalVotes,
    Vine,
    VerifiedPurchase,
    ReviewHeadline,
    ReviewBody,
    ReviewDate,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::Marketplace,
        Column::CustomerId,
        Column::ReviewId,
        Column::ProductId,
        Column::ProductParent,
        Column::ProductTitle,
        Column::ProductCategory,
        Column::StarRating,
        Column::HelpfulVotes,
        Column::TotalVotes,
        Column::Vine,
        Column::VerifiedPurchase,
        Column::ReviewHeadline,
        Column::ReviewBody,
        Column::ReviewDate,
    ];

    /// Ordinal position within a row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header name used by the published dataset.
    pub fn name(self) -> &'static str {
        match self {
            Column::Marketplace => "marketplace",
            Column::CustomerId => "customer_id",
            Column::ReviewId => "review_id",
            Column::ProductId => "product_id",
            Column::ProductParent => "product_parent",
            Column::ProductTitle => "product_title",
            Column::ProductCategory => "product_category",
            Column::StarRating => "star_rating",
            Column::HelpfulVotes => "helpful_votes",
            Column::TotalVotes => "total_votes",
            Column::Vine => "vine",
            Column::VerifiedPurchase => "verified_purchase",
            Column::ReviewHeadline => "review_headline",
            Column::ReviewBody => "review_body",
            Column::ReviewDate => "review_date",
        }
    }
}

/// Number of columns the record builder reads.
pub const SCHEMA_COLUMNS: usize = Column::ALL.len();

/// Header line for the dataset joined with `delimiter`. Handy for fixtures.
pub fn header_line(delimiter: &str) -> String {
    Column::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(delimiter)
}
