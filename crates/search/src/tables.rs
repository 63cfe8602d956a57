//! Point values and keyword tables used by the scorer and formatter.
//!
//! Components are summed without extra weighting, so these values are the
//! whole tuning surface of the ranking.

/// Data completeness points
pub mod completeness {
    /// Recognized nutrition grade (not "unknown")
    pub const NUTRITION_GRADE: i32 = 10;
    /// Recognized eco grade
    pub const ECO_GRADE: i32 = 5;
    /// Carbs, protein, fat and energy per 100g all present
    pub const CORE_NUTRIENTS: i32 = 10;
    /// Non-empty ingredients list
    pub const INGREDIENTS: i32 = 5;
}

/// Food quality points by processing level (NOVA group)
pub mod quality {
    /// Unprocessed or processed culinary ingredient (groups 1 and 2)
    pub const MINIMALLY_PROCESSED: i32 = 8;
    /// Processed food (group 3)
    pub const PROCESSED: i32 = 3;
    /// Ultra-processed food (group 4)
    pub const ULTRA_PROCESSED: i32 = -5;
}

/// Name relevance points
pub mod relevance {
    /// Case-insensitive exact name match
    pub const EXACT: i32 = 25;
    /// Name starts with the query
    pub const PREFIX: i32 = 20;
    /// Name contains the query
    pub const CONTAINS: i32 = 10;
    /// Whole-name similarity must exceed this to earn a fuzzy bonus
    pub const FUZZY_THRESHOLD: f64 = 0.6;
    /// Fuzzy bonus is `round(similarity * FUZZY_SCALE)`
    pub const FUZZY_SCALE: f64 = 12.0;
    /// Name contains a negative keyword
    pub const NEGATIVE_KEYWORD: i32 = -15;
    /// Name is simple and clean relative to the query
    pub const CLEAN_NAME: i32 = 8;
}

/// Word-level match points
pub mod word {
    /// Name word equals query word
    pub const EXACT: i32 = 15;
    /// Name word starts with query word
    pub const PREFIX: i32 = 12;
    /// Name word contains query word
    pub const CONTAINS: i32 = 8;
    /// Word similarity must exceed this to earn a fuzzy bonus
    pub const FUZZY_THRESHOLD: f64 = 0.7;
    /// Word fuzzy bonus is `round(similarity * FUZZY_SCALE)`
    pub const FUZZY_SCALE: f64 = 6.0;
    /// Name reproduces the query words in order
    pub const ORDER_PRESERVED: i32 = 5;
    /// Extra name words tolerated by the clean-name check
    pub const CLEAN_NAME_EXTRA_WORDS: usize = 2;
}

/// Simplicity points
pub mod simplicity {
    /// `(exclusive ingredient count bound, points)`, first match wins
    pub const INGREDIENT_TIERS: [(usize, i32); 2] = [(5, 5), (10, 2)];
    /// No brand, empty brand, or the placeholder brand
    pub const UNBRANDED: i32 = 3;
    /// `(inclusive word count bound, points)`, first match wins
    pub const NAME_LENGTH_TIERS: [(usize, i32); 2] = [(2, 5), (4, 2)];
    /// Name contains a complex descriptor phrase
    pub const COMPLEX_DESCRIPTOR: i32 = -3;
}

/// Brand placeholder written by some importers
pub const UNKNOWN_BRAND: &str = "Unknown Brand";

/// Terms marking a prepared or composite product rather than a base ingredient
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "flavored",
    "flavoured",
    "processed",
    "breaded",
    "battered",
    "sweetened",
    "candied",
    "imitation",
    "artificial",
    "substitute",
    "glazed",
];

/// Phrases describing a composed dish
pub const COMPLEX_DESCRIPTORS: &[&str] = &[
    "stuffed with",
    "served with",
    "topped with",
    "filled with",
    "mixed with",
    "coated in",
    "in sauce",
    "with sauce",
];

/// Units offered for every result, before deduplication
pub const COMMON_UNITS: &[&str] = &[
    "g", "kg", "ml", "l", "cup", "tbsp", "tsp", "piece", "slice", "serving",
];

/// Serving used when neither the serving text nor the API provides one
pub const DEFAULT_SERVING_QUANTITY: f64 = 100.0;
/// Unit of the default serving
pub const DEFAULT_SERVING_UNIT: &str = "g";
