//! Food records as delivered by the sources, and the candidate wrapper the
//! engine ranks.
//!
//! The external API and the local store name the same facts differently
//! (`product_name` vs `name`, `brands` vs `brand`, `code` vs `barcode`/`id`).
//! [`FoodRecord`] accepts both shapes; [`FoodCandidate`] resolves them,
//! preferring the external field when both are present.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// External nutrition database
    External,
    /// Local document store
    Local,
}

impl Provenance {
    /// Lowercase label, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::External => "external",
            Provenance::Local => "local",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition or environmental grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// Parse a grade, case-insensitively.
    ///
    /// `unknown`, `not-applicable` and anything unrecognized yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a-plus" | "a+" => Some(Self::APlus),
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            "d" => Some(Self::D),
            "e" => Some(Self::E),
            _ => None,
        }
    }
}

/// Processing-level classification (NOVA group 1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ProcessingLevel(u8);

impl ProcessingLevel {
    /// Returns `None` outside 1..=4.
    pub fn new(group: u8) -> Option<Self> {
        (1..=4).contains(&group).then_some(Self(group))
    }

    /// The NOVA group number.
    pub fn group(self) -> u8 {
        self.0
    }
}

/// Nutrients the engine knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Energy,
    Carbs,
    Protein,
    Fat,
    Fiber,
    Sugar,
    Sodium,
}

impl Nutrient {
    /// Every nutrient, in display order.
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Energy,
        Nutrient::Carbs,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Sodium,
    ];

    /// Per-100g field names, most specific first.
    pub fn per_100g_keys(self) -> &'static [&'static str] {
        match self {
            Nutrient::Energy => &["energy-kcal_100g", "energy-kcal", "calories_100g", "calories"],
            Nutrient::Carbs => &["carbohydrates_100g", "carbohydrates", "carbs"],
            Nutrient::Protein => &["proteins_100g", "proteins", "protein"],
            Nutrient::Fat => &["fat_100g", "fat"],
            Nutrient::Fiber => &["fiber_100g", "fiber"],
            Nutrient::Sugar => &["sugars_100g", "sugars", "sugar"],
            Nutrient::Sodium => &["sodium_100g", "sodium"],
        }
    }

    /// Per-serving field names.
    pub fn per_serving_keys(self) -> &'static [&'static str] {
        match self {
            Nutrient::Energy => &["energy-kcal_serving", "calories_serving"],
            Nutrient::Carbs => &["carbohydrates_serving", "carbs_serving"],
            Nutrient::Protein => &["proteins_serving", "protein_serving"],
            Nutrient::Fat => &["fat_serving"],
            Nutrient::Fiber => &["fiber_serving"],
            Nutrient::Sugar => &["sugars_serving", "sugar_serving"],
            Nutrient::Sodium => &["sodium_serving"],
        }
    }
}

/// Nutrient values keyed by upstream field name.
///
/// Numeric strings are accepted. Non-numeric, non-finite and negative values
/// are dropped on ingest, so every stored value is a non-negative number.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nutriments(BTreeMap<String, f64>);

impl Nutriments {
    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// First value found among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// Insert a value. Returns false, storing nothing, for negative or
    /// non-finite values.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> bool {
        if value.is_finite() && value >= 0.0 {
            self.0.insert(key.into(), value);
            true
        } else {
            false
        }
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Nutriments {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut nutriments = Nutriments::default();
        for (key, value) in iter {
            nutriments.insert(key, value);
        }
        nutriments
    }
}

impl<'de> Deserialize<'de> for Nutriments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Anything but an object (null, [], "n/a") carries no usable values
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        let Some(serde_json::Value::Object(raw)) = raw else {
            return Ok(Self::default());
        };
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| lenient::as_number(&value).map(|n| (key, n)))
            .collect())
    }
}

/// A raw food record from either source.
///
/// Text fields are trimmed on ingest and blank text is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodRecord {
    /// External display name
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// Local display name
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// External brand list (comma separated)
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub brands: Option<String>,
    /// Local brand
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// External barcode
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Local barcode
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    /// Local document id
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Free-text, comma-separated ingredients
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub ingredients_text: Option<String>,

    /// Nutri-Score, external field name
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub nutrition_grades: Option<String>,
    /// Nutri-Score, newer external field name
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub nutriscore_grade: Option<String>,
    /// Eco-Score
    #[serde(deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub ecoscore_grade: Option<String>,

    /// NOVA group as delivered; may be out of range
    #[serde(deserialize_with = "lenient::small_int", skip_serializing_if = "Option::is_none")]
    pub nova_group: Option<u8>,

    /// Nutrient values, per 100g and per serving
    #[serde(alias = "nutrients", skip_serializing_if = "Nutriments::is_empty")]
    pub nutriments: Nutriments,

    /// Free-form serving size, e.g. `"30 g"` or `"1 cup (240 ml)"`
    #[serde(
        alias = "servingSize",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_size: Option<String>,
    /// Serving quantity as computed upstream
    #[serde(deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub serving_quantity: Option<f64>,
    /// Unit of `serving_quantity`
    #[serde(
        alias = "servingUnit",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub serving_quantity_unit: Option<String>,

    /// Thumbnail
    #[serde(
        alias = "imageUrl",
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_front_small_url: Option<String>,
}

impl FoodRecord {
    /// Decode a source payload one element at a time.
    ///
    /// Elements that are not records are logged and skipped, so one bad row
    /// never costs the rest of the batch.
    pub fn decode_all(values: Vec<serde_json::Value>, source_name: &str) -> Vec<Self> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        source = source_name,
                        index,
                        error = %err,
                        "Skipping malformed record"
                    );
                    None
                }
            })
            .collect()
    }

    /// Record with only a display name set, in the local store's shape.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// A food record tagged with its provenance.
///
/// The provenance is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodCandidate {
    record: FoodRecord,
    provenance: Provenance,
}

impl FoodCandidate {
    /// Tag a record.
    pub fn new(record: FoodRecord, provenance: Provenance) -> Self {
        Self { record, provenance }
    }

    /// Where this candidate came from.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// The raw record.
    pub fn record(&self) -> &FoodRecord {
        &self.record
    }

    /// Display name; empty when the record has none.
    pub fn name(&self) -> &str {
        self.record
            .product_name
            .as_deref()
            .or(self.record.name.as_deref())
            .unwrap_or_default()
    }

    /// Brand, if any.
    pub fn brand(&self) -> Option<&str> {
        self.record.brands.as_deref().or(self.record.brand.as_deref())
    }

    /// Barcode or document id, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.record
            .code
            .as_deref()
            .or(self.record.barcode.as_deref())
            .or(self.record.id.as_deref())
    }

    /// Ingredients text, if any.
    pub fn ingredients(&self) -> Option<&str> {
        self.record.ingredients_text.as_deref()
    }

    /// Recognized nutrition grade.
    pub fn nutrition_grade(&self) -> Option<Grade> {
        self.record
            .nutrition_grades
            .as_deref()
            .and_then(Grade::parse)
            .or_else(|| self.record.nutriscore_grade.as_deref().and_then(Grade::parse))
    }

    /// Recognized eco grade.
    pub fn eco_grade(&self) -> Option<Grade> {
        self.record.ecoscore_grade.as_deref().and_then(Grade::parse)
    }

    /// Recognized processing level.
    pub fn processing_level(&self) -> Option<ProcessingLevel> {
        self.record.nova_group.and_then(ProcessingLevel::new)
    }

    /// Per-100g value of a nutrient.
    pub fn nutrient_per_100g(&self, nutrient: Nutrient) -> Option<f64> {
        self.record.nutriments.first_of(nutrient.per_100g_keys())
    }

    /// Per-serving value of a nutrient.
    pub fn nutrient_per_serving(&self, nutrient: Nutrient) -> Option<f64> {
        self.record.nutriments.first_of(nutrient.per_serving_keys())
    }
}

/// Deserializers that accept the loosely-typed values both sources emit.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn as_number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        }?;
        (n.is_finite() && n >= 0.0).then_some(n)
    }

    pub(super) fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub(super) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(as_number))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(super) fn small_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
        Ok(number(d)?
            .filter(|n| n.fract() == 0.0 && *n <= f64::from(u8::MAX))
            .map(|n| n as u8))
    }
}
