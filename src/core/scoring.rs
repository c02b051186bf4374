use crate::core::{
    dimensions::{calculate_dimension_fit, dimension_score},
    keywords::contains_any,
    protection::protection_score,
};
use crate::models::{Case, DimensionFit, Gear, MatchOptions, ScoringWeights};

/// Feature sub-score when no features were requested
pub const DEFAULT_FEATURE_SCORE: f64 = 75.0;
/// Rating sub-score for unrated cases
pub const DEFAULT_RATING_SCORE: f64 = 50.0;
/// Highest value on the rating scale
pub const MAX_RATING: f64 = 5.0;

/// Sub-scores and the weighted total for one (gear, case) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompatibilityBreakdown {
    pub compatibility_score: u8,
    pub dimension_fit: DimensionFit,
    pub dimension_score: f64,
    pub protection_score: f64,
    pub feature_score: f64,
    pub rating_score: f64,
}

/// Calculate a compatibility score (0-100) for a case holding a piece of gear
///
/// Scoring formula:
/// score = round(
///     dimension_score * 0.40 +     # occupancy graded against the 70-90% band
///     protection_score * 0.25 +    # case tier vs. recommended tier
///     feature_score * 0.20 +       # requested feature tags present
///     rating_score * 0.15          # customer rating on a 0-100 scale
/// )
pub fn calculate_compatibility_score(
    gear: &Gear,
    case: &Case,
    options: &MatchOptions,
    weights: &ScoringWeights,
) -> CompatibilityBreakdown {
    let dimension_fit = calculate_dimension_fit(&gear.dimensions, &case.internal_dimensions);
    let dimension_score = dimension_score(&dimension_fit);
    let protection_score = protection_score(gear, case.protection_level);
    let feature_score = calculate_requested_feature_score(case, &options.preferred_features);
    let rating_score = calculate_rating_score(case.rating);

    let total = dimension_score * weights.dimension
        + protection_score * weights.protection
        + feature_score * weights.features
        + rating_score * weights.rating;

    CompatibilityBreakdown {
        compatibility_score: total.round().clamp(0.0, 100.0) as u8,
        dimension_fit,
        dimension_score,
        protection_score,
        feature_score,
        rating_score,
    }
}

/// Share of requested features found among the case's feature tags (0-100)
#[inline]
pub fn calculate_requested_feature_score(case: &Case, requested: &[String]) -> f64 {
    if requested.is_empty() {
        return DEFAULT_FEATURE_SCORE;
    }

    let found = requested
        .iter()
        .filter(|feature| {
            let wanted = std::slice::from_ref(*feature);
            case.features.iter().any(|tag| contains_any(Some(tag), wanted))
        })
        .count();

    found as f64 / requested.len() as f64 * 100.0
}

/// Rating on a 0-100 scale; unrated or malformed ratings get the neutral default
#[inline]
pub fn calculate_rating_score(rating: Option<f64>) -> f64 {
    match rating {
        Some(value) if value.is_finite() && value > 0.0 => value.min(MAX_RATING) / MAX_RATING * 100.0,
        _ => DEFAULT_RATING_SCORE,
    }
}
