//! Projection of scored candidates into API results.

use crate::candidate::{FoodCandidate, Grade, Nutrient, Provenance};
use crate::scoring::{ScoreBreakdown, ScoredCandidate};
use crate::serving::{parse_serving_size, ServingSizeInfo};
use crate::tables;
use serde::Serialize;
use std::collections::BTreeSet;

/// One ranked food, shaped for the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub source: Provenance,
    pub image_url: Option<String>,
    pub nutrition_grade: Option<Grade>,
    pub eco_grade: Option<Grade>,
    pub nova_group: Option<u8>,
    #[serde(rename = "per100g")]
    pub per_100g: NutrientProjection,
    pub per_serving: Option<NutrientProjection>,
    pub score: i32,
    pub score_breakdown: ScoreBreakdown,
    pub serving_size: ServingSizeInfo,
    pub default_serving: DefaultServing,
    /// Lowercased, deduplicated, alphabetical
    pub units: Vec<String>,
}

/// Nutrient values for one basis (per 100g or per serving).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientProjection {
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
}

impl NutrientProjection {
    fn collect(read: impl Fn(Nutrient) -> Option<f64>) -> Self {
        Self {
            calories: read(Nutrient::Energy),
            carbs: read(Nutrient::Carbs),
            protein: read(Nutrient::Protein),
            fat: read(Nutrient::Fat),
            fiber: read(Nutrient::Fiber),
            sugar: read(Nutrient::Sugar),
            sodium: read(Nutrient::Sodium),
        }
    }

    /// True when no nutrient has a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Serving a client should preselect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultServing {
    pub quantity: f64,
    pub unit: String,
}

/// Build the API result for a scored candidate.
///
/// The default serving comes from the parsed serving text when it has both
/// quantity and unit, then from the API's serving quantity, then from a
/// bare parsed quantity in grams, and finally 100 g.
pub fn format_result(scored: &ScoredCandidate) -> SearchResult {
    let candidate = scored.candidate();
    let record = candidate.record();

    let serving_size = parse_serving_size(record.serving_size.as_deref());
    let api_unit = record.serving_quantity_unit.as_deref().map(normalize_unit);
    let parsed_unit = serving_size.unit.as_deref().map(normalize_unit);
    let default_serving =
        default_serving(&serving_size, parsed_unit.as_deref(), candidate, api_unit.as_deref());

    let units: BTreeSet<String> = [parsed_unit, api_unit, Some(default_serving.unit.clone())]
        .into_iter()
        .flatten()
        .chain(tables::COMMON_UNITS.iter().map(|unit| (*unit).to_string()))
        .filter(|unit| !unit.is_empty())
        .collect();

    let per_serving = NutrientProjection::collect(|n| candidate.nutrient_per_serving(n));

    SearchResult {
        id: candidate.identifier().map(str::to_string),
        name: candidate.name().to_string(),
        brand: candidate.brand().map(str::to_string),
        source: candidate.provenance(),
        image_url: record.image_front_small_url.clone(),
        nutrition_grade: candidate.nutrition_grade(),
        eco_grade: candidate.eco_grade(),
        nova_group: candidate.processing_level().map(|level| level.group()),
        per_100g: NutrientProjection::collect(|n| candidate.nutrient_per_100g(n)),
        per_serving: (!per_serving.is_empty()).then_some(per_serving),
        score: scored.total(),
        score_breakdown: scored.breakdown(),
        serving_size,
        default_serving,
        units: units.into_iter().collect(),
    }
}

fn default_serving(
    parsed: &ServingSizeInfo,
    parsed_unit: Option<&str>,
    candidate: &FoodCandidate,
    api_unit: Option<&str>,
) -> DefaultServing {
    let (quantity, unit) = match (parsed.quantity, parsed_unit, candidate.record().serving_quantity) {
        (Some(quantity), Some(unit), _) => (quantity, unit),
        (_, _, Some(quantity)) => (quantity, api_unit.unwrap_or(tables::DEFAULT_SERVING_UNIT)),
        (Some(quantity), None, None) => (quantity, tables::DEFAULT_SERVING_UNIT),
        (None, _, None) => (tables::DEFAULT_SERVING_QUANTITY, tables::DEFAULT_SERVING_UNIT),
    };

    DefaultServing {
        quantity,
        unit: unit.to_string(),
    }
}

fn normalize_unit(unit: &str) -> String {
    unit.trim().to_lowercase()
}
