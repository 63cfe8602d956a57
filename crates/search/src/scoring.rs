//! Multi-factor candidate scoring.
//!
//! Four components are computed independently and summed without
//! weighting:
//! - data completeness (0..=30)
//! - food quality from the processing level (-5..=8)
//! - name relevance against the query (unbounded)
//! - simplicity of ingredients, brand and name (about -3..=13)

use crate::candidate::{FoodCandidate, Nutrient, Provenance};
use crate::similarity::similarity_ratio;
use crate::tables::{self, completeness, quality, relevance, simplicity};
use crate::words::{is_simple_clean_name, word_match_score};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Per-component score for one candidate.
///
/// The total is always recomputed from the components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Grades, core nutrients and ingredients present
    pub data_completeness: i32,
    /// Processing level preference
    pub quality: i32,
    /// How well the name matches the query
    pub name_relevance: i32,
    /// Short ingredient list, no brand, short name
    pub simplicity: i32,
}

impl ScoreBreakdown {
    /// Sum of the four components.
    pub fn total(&self) -> i32 {
        self.data_completeness + self.quality + self.name_relevance + self.simplicity
    }
}

impl Serialize for ScoreBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScoreBreakdown", 5)?;
        state.serialize_field("dataCompleteness", &self.data_completeness)?;
        state.serialize_field("quality", &self.quality)?;
        state.serialize_field("nameRelevance", &self.name_relevance)?;
        state.serialize_field("simplicity", &self.simplicity)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// A candidate with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    candidate: FoodCandidate,
    breakdown: ScoreBreakdown,
}

impl ScoredCandidate {
    /// The scored candidate.
    pub fn candidate(&self) -> &FoodCandidate {
        &self.candidate
    }

    /// The score components.
    pub fn breakdown(&self) -> ScoreBreakdown {
        self.breakdown
    }

    /// Total score.
    pub fn total(&self) -> i32 {
        self.breakdown.total()
    }
}

/// Score a candidate against a query.
pub fn score(candidate: &FoodCandidate, query: &str) -> ScoreBreakdown {
    let name = candidate.name().to_lowercase();
    let query = query.trim().to_lowercase();

    ScoreBreakdown {
        data_completeness: data_completeness(candidate),
        quality: food_quality(candidate),
        name_relevance: name_relevance(&name, &query),
        simplicity: simplicity(candidate, &name),
    }
}

/// Score a candidate and apply the provenance filter.
///
/// External candidates with a non-positive total are dropped; local
/// candidates are always kept.
pub fn score_candidate(candidate: FoodCandidate, query: &str) -> Option<ScoredCandidate> {
    let breakdown = score(&candidate, query);

    if candidate.provenance() == Provenance::External && breakdown.total() <= 0 {
        tracing::trace!(
            name = candidate.name(),
            total = breakdown.total(),
            "Dropping low-scoring external candidate"
        );
        return None;
    }

    Some(ScoredCandidate {
        candidate,
        breakdown,
    })
}

fn data_completeness(candidate: &FoodCandidate) -> i32 {
    let mut points = 0;

    if candidate.nutrition_grade().is_some() {
        points += completeness::NUTRITION_GRADE;
    }
    if candidate.eco_grade().is_some() {
        points += completeness::ECO_GRADE;
    }

    let core = [Nutrient::Carbs, Nutrient::Protein, Nutrient::Fat, Nutrient::Energy];
    if core.iter().all(|n| candidate.nutrient_per_100g(*n).is_some()) {
        points += completeness::CORE_NUTRIENTS;
    }

    if ingredient_count(candidate) > 0 {
        points += completeness::INGREDIENTS;
    }

    points
}

fn food_quality(candidate: &FoodCandidate) -> i32 {
    match candidate.processing_level().map(|level| level.group()) {
        Some(1 | 2) => quality::MINIMALLY_PROCESSED,
        Some(3) => quality::PROCESSED,
        Some(4) => quality::ULTRA_PROCESSED,
        _ => 0,
    }
}

/// Name relevance of an already-lowercased name for a lowercased query.
///
/// With a blank query only the negative-keyword penalty applies.
#[allow(clippy::cast_possible_truncation)]
pub fn name_relevance(name: &str, query: &str) -> i32 {
    let mut points = 0;

    if !query.is_empty() {
        if name == query {
            points += relevance::EXACT;
        } else if name.starts_with(query) {
            points += relevance::PREFIX;
        } else if name.contains(query) {
            points += relevance::CONTAINS;
        }

        let sim = similarity_ratio(name, query);
        if sim > relevance::FUZZY_THRESHOLD {
            points += (sim * relevance::FUZZY_SCALE).round() as i32;
        }

        points += word_match_score(name, query);

        if is_simple_clean_name(name, query) {
            points += relevance::CLEAN_NAME;
        }
    }

    if tables::NEGATIVE_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        points += relevance::NEGATIVE_KEYWORD;
    }

    points
}

fn simplicity(candidate: &FoodCandidate, name: &str) -> i32 {
    let mut points = 0;

    let ingredients = ingredient_count(candidate);
    if ingredients > 0 {
        points += simplicity::INGREDIENT_TIERS
            .iter()
            .find(|(bound, _)| ingredients < *bound)
            .map_or(0, |(_, bonus)| *bonus);
    }

    let unbranded = candidate
        .brand()
        .is_none_or(|brand| brand.is_empty() || brand.eq_ignore_ascii_case(tables::UNKNOWN_BRAND));
    if unbranded {
        points += simplicity::UNBRANDED;
    }

    let words = name.split_whitespace().count();
    points += simplicity::NAME_LENGTH_TIERS
        .iter()
        .find(|(bound, _)| words <= *bound)
        .map_or(0, |(_, bonus)| *bonus);

    if tables::COMPLEX_DESCRIPTORS.iter().any(|phrase| name.contains(phrase)) {
        points += simplicity::COMPLEX_DESCRIPTOR;
    }

    points
}

/// Non-empty comma-separated ingredients; 0 when the text is absent.
fn ingredient_count(candidate: &FoodCandidate) -> usize {
    candidate.ingredients().map_or(0, |text| {
        text.split(',').filter(|part| !part.trim().is_empty()).count()
    })
}
