//! Column names of the listings dataset.
//!
//! Names are the trimmed header names; the raw source carries some of them
//! with stray whitespace (e.g. `"Neighbourhood "`), which header
//! normalization removes before any stage looks a column up.

pub const HOST_ID: &str = "Host Id";
pub const HOST_SINCE: &str = "Host Since";
pub const NEIGHBOURHOOD: &str = "Neighbourhood";
pub const ZIPCODE: &str = "Zipcode";
pub const PROPERTY_TYPE: &str = "Property Type";
pub const ROOM_TYPE: &str = "Room Type";
pub const BEDS: &str = "Beds";
pub const PRICE: &str = "Price";
pub const NUMBER_OF_RECORDS: &str = "Number of Records";
pub const NUMBER_OF_REVIEWS: &str = "Number Of Reviews";
pub const REVIEW_SCORES_RATING: &str = "Review Scores Rating";

/// Pre-binned rating column, derivable from the rating and dropped on cleaning.
pub const REVIEW_SCORES_RATING_BIN: &str = "Review Scores Rating (bin)";

/// Output projection, in order. Any other column is dropped.
pub const CANONICAL_COLUMNS: [&str; 11] = [
    HOST_ID,
    HOST_SINCE,
    NEIGHBOURHOOD,
    ZIPCODE,
    PROPERTY_TYPE,
    ROOM_TYPE,
    BEDS,
    PRICE,
    NUMBER_OF_RECORDS,
    NUMBER_OF_REVIEWS,
    REVIEW_SCORES_RATING,
];

/// Auxiliary columns pruned before type coercion.
pub const AUXILIARY_COLUMNS: [&str; 1] = [REVIEW_SCORES_RATING_BIN];

/// Kept as text; leading zeros are significant.
pub const TEXT_COLUMNS: [&str; 1] = [ZIPCODE];

/// Coerced to Float64; unparseable values become null.
pub const NUMERIC_COLUMNS: [&str; 4] = [
    PRICE,
    NUMBER_OF_RECORDS,
    NUMBER_OF_REVIEWS,
    REVIEW_SCORES_RATING,
];

/// Rows with a null in any of these are dropped.
pub const REQUIRED_COLUMNS: [&str; 4] = [HOST_ID, REVIEW_SCORES_RATING, ZIPCODE, NEIGHBOURHOOD];

/// Stored as categorical labels.
pub const CATEGORICAL_COLUMNS: [&str; 4] = [NEIGHBOURHOOD, ROOM_TYPE, BEDS, PROPERTY_TYPE];

/// Price fallback groups, tried in order.
pub const PRICE_FALLBACK_GROUPS: [&str; 2] = [ZIPCODE, NEIGHBOURHOOD];
