use serde::{Deserialize, Serialize};

use crate::core::keywords::{contains_any, COMPARTMENTS, PADDING};
use crate::core::protection::protection_score;
use crate::models::{Case, FeatureOptions, Gear, Weight};

/// Score returned when no factor is active
pub const DEFAULT_FEATURE_SCORE: u8 = 75;

/// Case annotated with its qualitative feature score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatch {
    #[serde(flatten)]
    pub case: Case,
    #[serde(rename = "featureScore")]
    pub feature_score: u8,
}

/// Rank `cases` by how well their qualitative attributes suit `gear`
///
/// Sorting is stable, so equally scored cases keep their input order.
pub fn match_features(gear: &Gear, cases: Vec<Case>, options: &FeatureOptions) -> Vec<FeatureMatch> {
    let mut matches: Vec<FeatureMatch> = cases
        .into_iter()
        .map(|case| {
            let feature_score = calculate_feature_score(gear, &case, options);
            tracing::trace!("Feature score for case {}: {}", case.id, feature_score);
            FeatureMatch { case, feature_score }
        })
        .collect();

    matches.sort_by(|a, b| b.feature_score.cmp(&a.feature_score));

    tracing::debug!("Ranked {} cases by feature fit for gear {}", matches.len(), gear.id);

    matches
}

/// Average of all active factor scores, each worth 0-100
///
/// Requested options and the weight ratio (when both weights are known) are the
/// active factors; the protection match joins them whenever at least one is
/// active. With nothing active the result is [`DEFAULT_FEATURE_SCORE`].
pub fn calculate_feature_score(gear: &Gear, case: &Case, options: &FeatureOptions) -> u8 {
    let mut factors: Vec<f64> = Vec::with_capacity(10);

    let flag = |present: bool| if present { 100.0 } else { 0.0 };

    if options.require_waterproof {
        factors.push(flag(case.waterproof));
    }
    if options.require_shockproof {
        factors.push(flag(case.shockproof));
    }
    if options.require_handle {
        factors.push(flag(case.has_handle));
    }
    if options.require_wheels {
        factors.push(flag(case.has_wheels));
    }
    if options.require_padding {
        factors.push(flag(PADDING.matches(case)));
    }
    if options.require_compartments {
        factors.push(flag(COMPARTMENTS.matches(case)));
    }
    if !options.preferred_material.is_empty() {
        factors.push(flag(contains_any(case.material.as_deref(), &options.preferred_material)));
    }
    if !options.preferred_color.is_empty() {
        factors.push(flag(contains_any(case.color.as_deref(), &options.preferred_color)));
    }
    if let Some(score) = weight_ratio_score(gear.weight.as_ref(), case.weight.as_ref()) {
        factors.push(score);
    }

    if factors.is_empty() {
        return DEFAULT_FEATURE_SCORE;
    }

    factors.push(protection_score(gear, case.protection_level));

    let average = factors.iter().sum::<f64>() / factors.len() as f64;
    average.round().clamp(0.0, 100.0) as u8
}

/// Grade the case-to-gear weight ratio, lighter cases score higher
///
/// Returns `None` unless both weights are known and positive.
pub fn weight_ratio_score(gear_weight: Option<&Weight>, case_weight: Option<&Weight>) -> Option<f64> {
    let gear_kg = gear_weight?.kilograms()?;
    let case_kg = case_weight?.kilograms()?;
    let ratio = case_kg / gear_kg;

    let score = if ratio <= 0.5 {
        100.0
    } else if ratio <= 0.75 {
        75.0
    } else if ratio <= 1.0 {
        50.0
    } else {
        25.0
    };
    Some(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimensions, LengthUnit, MassUnit, ProtectionLevel};

    fn synth(weight: Option<Weight>) -> Gear {
        Gear {
            id: "g1".to_string(),
            category: "Synthesizer".to_string(),
            gear_type: "Polysynth".to_string(),
            brand: "Sequential".to_string(),
            name: "Prophet 6".to_string(),
            dimensions: Dimensions::new(20.0, 10.0, 5.0, LengthUnit::Inches),
            weight,
        }
    }

    fn case(id: &str) -> Case {
        Case {
            id: id.to_string(),
            brand: "Gator".to_string(),
            name: "Road Case".to_string(),
            description: None,
            internal_dimensions: Dimensions::new(24.0, 12.0, 6.0, LengthUnit::Inches),
            weight: None,
            protection_level: ProtectionLevel::High,
            waterproof: false,
            shockproof: false,
            has_handle: false,
            has_wheels: false,
            material: None,
            color: None,
            features: vec![],
            price: 150.0,
            currency: "USD".to_string(),
            rating: Some(4.5),
            review_count: 10,
        }
    }

    #[test]
    fn test_default_score_without_factors() {
        let gear = synth(None);
        let results = match_features(&gear, vec![case("a"), case("b")], &FeatureOptions::default());

        assert!(results.iter().all(|m| m.feature_score == DEFAULT_FEATURE_SCORE));
        assert_eq!(results[0].case.id, "a");
    }

    #[test]
    fn test_required_flags_with_protection_factor() {
        let gear = synth(None);
        let mut waterproof = case("w");
        waterproof.waterproof = true;
        let options = FeatureOptions {
            require_waterproof: true,
            require_wheels: true,
            ..FeatureOptions::default()
        };

        // waterproof 100, wheels 0, protection 100 → 66.67
        assert_eq!(calculate_feature_score(&gear, &waterproof, &options), 67);
        // waterproof 0, wheels 0, protection 100
        assert_eq!(calculate_feature_score(&gear, &case("x"), &options), 33);
    }

    #[test]
    fn test_padding_and_compartment_keywords() {
        let gear = synth(None);
        let mut padded = case("p");
        padded.description = Some("Thick foam interior".to_string());
        padded.features = vec!["Zip pocket".to_string()];
        let options = FeatureOptions {
            require_padding: true,
            require_compartments: true,
            ..FeatureOptions::default()
        };

        assert_eq!(calculate_feature_score(&gear, &padded, &options), 100);
    }

    #[test]
    fn test_material_and_color_any_of() {
        let gear = synth(None);
        let mut c = case("m");
        c.material = Some("Ballistic Nylon".to_string());
        c.color = Some("Black".to_string());
        let options = FeatureOptions {
            preferred_material: vec!["nylon".to_string(), "leather".to_string()],
            preferred_color: vec!["red".to_string()],
            ..FeatureOptions::default()
        };

        // material 100, color 0, protection 100
        assert_eq!(calculate_feature_score(&gear, &c, &options), 67);
    }

    #[test]
    fn test_weight_ratio_thresholds() {
        let gear_weight = Weight::new(10.0, MassUnit::Pounds);
        let score = |kg: f64| weight_ratio_score(Some(&gear_weight), Some(&Weight::new(kg, MassUnit::Kilograms)));

        // 10 lb ≈ 4.536 kg
        assert_eq!(score(2.0), Some(100.0));
        assert_eq!(score(3.0), Some(75.0));
        assert_eq!(score(4.0), Some(50.0));
        assert_eq!(score(6.0), Some(25.0));
        assert_eq!(weight_ratio_score(None, Some(&gear_weight)), None);
    }

    #[test]
    fn test_weight_factor_activates_without_options() {
        let gear = synth(Some(Weight::new(10.0, MassUnit::Kilograms)));
        let mut light = case("light");
        light.weight = Some(Weight::new(2.0, MassUnit::Kilograms));

        // weight 100, protection 100
        assert_eq!(calculate_feature_score(&gear, &light, &FeatureOptions::default()), 100);
    }

    #[test]
    fn test_sorted_descending() {
        let gear = synth(None);
        let plain = case("plain");
        let mut handled = case("handled");
        handled.has_handle = true;
        let options = FeatureOptions {
            require_handle: true,
            ..FeatureOptions::default()
        };

        let results = match_features(&gear, vec![plain, handled], &options);

        assert_eq!(results[0].case.id, "handled");
        assert!(results[0].feature_score > results[1].feature_score);
    }
}
