use crate::core::dimensions::grade_axis_strict;
use crate::core::keywords::{
    KeywordRule, CABLE_COMPARTMENT, COMPARTMENTS, HOOK_AND_LOOP, PADDING, PEDALBOARD, POWER_SUPPLY,
};
use crate::models::{Case, Gear, GearCategory, ScoredMatch};

/// Flat bonus for cases that name the gear they were built for
pub const DESIGNED_FOR_BONUS: f64 = 20.0;

const COMPATIBILITY_WEIGHT: f64 = 0.50;
const DIMENSION_WEIGHT: f64 = 0.15;
const FEATURE_WEIGHT: f64 = 0.15;

/// Stricter 0-100 estimate of whether a match is a good recommendation
///
/// Half of the match's compatibility score, a flat bonus when the case looks
/// purpose-built for the gear, and 15% each of a strict per-axis fit grade
/// and a category-specific feature allocation.
pub fn calculate_confidence_score(gear: &Gear, scored: &ScoredMatch) -> u8 {
    let mut confidence = f64::from(scored.compatibility_score) * COMPATIBILITY_WEIGHT;

    if is_designed_for(gear, &scored.case) {
        confidence += DESIGNED_FOR_BONUS;
    }

    let axes = scored.dimension_fit.axes();
    let strict_fit = axes.iter().map(|fit| grade_axis_strict(*fit)).sum::<f64>() / axes.len() as f64;
    confidence += strict_fit * DIMENSION_WEIGHT;

    confidence += feature_appropriateness(gear.category_kind(), &scored.case) * FEATURE_WEIGHT;

    confidence.round().clamp(0.0, 100.0) as u8
}

/// A case looks purpose-built when its name or description mentions the gear
/// (type, category, or any word of its name) together with the word "case"
///
/// Each text is checked on its own; single-character tokens are ignored.
pub fn is_designed_for(gear: &Gear, case: &Case) -> bool {
    let tokens = gear_tokens(gear);
    if tokens.is_empty() {
        return false;
    }

    case.description
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(case.name.as_str()))
        .map(str::to_lowercase)
        .any(|text| text.contains("case") && tokens.iter().any(|token| text.contains(token.as_str())))
}

fn gear_tokens(gear: &Gear) -> Vec<String> {
    [gear.gear_type.as_str(), gear.category.as_str()]
        .into_iter()
        .chain(gear.name.split_whitespace())
        .map(|token| token.trim().to_lowercase())
        .filter(|token| token.chars().count() >= 2)
        .collect()
}

/// Points a case earns for features that matter to the gear's category, capped at 100
pub fn feature_appropriateness(category: GearCategory, case: &Case) -> f64 {
    let keyword = |rule: &KeywordRule, points: f64| if rule.matches(case) { points } else { 0.0 };
    let flag = |present: bool, points: f64| if present { points } else { 0.0 };

    let score = match category {
        GearCategory::Synthesizer | GearCategory::Mixer => {
            keyword(&PADDING, 40.0) + keyword(&COMPARTMENTS, 30.0) + flag(case.has_handle, 30.0)
        }
        GearCategory::DrumMachine => {
            keyword(&PADDING, 30.0) + flag(case.shockproof, 40.0) + keyword(&COMPARTMENTS, 30.0)
        }
        GearCategory::EffectsPedal => {
            keyword(&PEDALBOARD, 50.0) + keyword(&HOOK_AND_LOOP, 30.0) + keyword(&POWER_SUPPLY, 20.0)
        }
        GearCategory::AudioInterface => {
            keyword(&PADDING, 30.0) + keyword(&CABLE_COMPARTMENT, 40.0) + flag(case.waterproof, 30.0)
        }
        GearCategory::Other => {
            keyword(&PADDING, 40.0) + flag(case.has_handle, 30.0) + keyword(&COMPARTMENTS, 30.0)
        }
    };

    score.min(100.0)
}
