use std::sync::Arc;

use thiserror::Error;

use crate::core::{
    confidence::calculate_confidence_score,
    filters::build_case_filter,
    scoring::calculate_compatibility_score,
};
use crate::models::{
    Case, Gear, GearRef, MatchOptions, MatchRecord, RecommendationType, ScoredMatch,
    ScoringWeights, SortField, SortOrder,
};
use crate::services::{CaseCatalog, GearCatalog, MatchRepository, RepositoryError};

/// Errors surfaced by the matching engine
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Gear not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Main matching orchestrator - implements the multi-stage candidate pipeline
///
/// # Pipeline Stages
/// 1. Gear resolution
/// 2. Catalog pre-filter (dimension buffer, price, protection, flags, brands)
/// 3. Compatibility scoring
/// 4. Minimum score cut, sort and page
/// 5. Best-effort persistence of the page
#[derive(Clone)]
pub struct ProductMatcher {
    gear_catalog: Arc<dyn GearCatalog>,
    case_catalog: Arc<dyn CaseCatalog>,
    match_repository: Arc<dyn MatchRepository>,
    weights: ScoringWeights,
}

impl ProductMatcher {
    pub fn new(
        gear_catalog: Arc<dyn GearCatalog>,
        case_catalog: Arc<dyn CaseCatalog>,
        match_repository: Arc<dyn MatchRepository>,
        weights: ScoringWeights,
    ) -> Self {
        Self {
            gear_catalog,
            case_catalog,
            match_repository,
            weights,
        }
    }

    /// Build a matcher whose three ports are served by one adapter
    pub fn from_store<S>(store: Arc<S>, weights: ScoringWeights) -> Self
    where
        S: GearCatalog + CaseCatalog + MatchRepository + 'static,
    {
        Self::new(store.clone(), store.clone(), store, weights)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn match_repository(&self) -> &Arc<dyn MatchRepository> {
        &self.match_repository
    }

    /// Resolve a gear reference against the catalog
    pub async fn resolve_gear(&self, gear: GearRef) -> Result<Gear, MatchError> {
        match gear {
            GearRef::Gear(gear) => Ok(*gear),
            GearRef::Id(id) => {
                let gear = self.gear_catalog.get_gear_by_id(&id).await?;
                gear.ok_or(MatchError::NotFound(id))
            }
        }
    }

    /// Find compatible cases for a piece of gear
    ///
    /// Returns at most `options.max_results` matches scoring at least
    /// `options.min_compatibility_score`, ordered by `options.sort_by`.
    /// Each returned match is upserted into the match repository; write
    /// failures are logged and do not affect the result.
    pub async fn find_compatible_cases(
        &self,
        gear: impl Into<GearRef>,
        options: &MatchOptions,
    ) -> Result<Vec<ScoredMatch>, MatchError> {
        let gear = self.resolve_gear(gear.into()).await?;

        let filter = build_case_filter(&gear, options);
        let candidates = self.case_catalog.query_cases(&filter).await?;
        let total_candidates = candidates.len();

        let matches = self.rank_candidates(&gear, candidates, options);

        tracing::info!(
            "Found {} compatible cases for gear {} (from {} candidates)",
            matches.len(),
            gear.id,
            total_candidates
        );

        self.persist_matches(&matches).await;

        Ok(matches)
    }

    /// Score, cut, sort and page an already fetched candidate list
    pub fn rank_candidates(
        &self,
        gear: &Gear,
        candidates: Vec<Case>,
        options: &MatchOptions,
    ) -> Vec<ScoredMatch> {
        let mut scored: Vec<ScoredMatch> = candidates
            .into_iter()
            .map(|case| self.score_case(gear, case, options))
            .filter(|scored| scored.compatibility_score >= options.min_compatibility_score)
            .collect();

        tracing::debug!(
            "{} candidates at or above score {} for gear {}",
            scored.len(),
            options.min_compatibility_score,
            gear.id
        );

        sort_matches(&mut scored, options.sort_by, options.sort_order);
        scored.truncate(options.max_results);
        scored
    }

    /// Score a single case for a piece of gear
    pub fn score_case(&self, gear: &Gear, case: Case, options: &MatchOptions) -> ScoredMatch {
        let breakdown = calculate_compatibility_score(gear, &case, options, &self.weights);

        tracing::trace!(
            "Case {} scored {} (dimension {:.1}, protection {}, features {:.1}, rating {:.1})",
            case.id,
            breakdown.compatibility_score,
            breakdown.dimension_score,
            breakdown.protection_score,
            breakdown.feature_score,
            breakdown.rating_score
        );

        let mut scored = ScoredMatch {
            gear_id: gear.id.clone(),
            case,
            compatibility_score: breakdown.compatibility_score,
            dimension_fit: breakdown.dimension_fit,
            dimension_score: breakdown.dimension_score,
            protection_score: breakdown.protection_score,
            feature_score: breakdown.feature_score,
            rating_score: breakdown.rating_score,
            recommendation_type: RecommendationType::Primary,
            confidence_score: 0,
        };
        scored.confidence_score = calculate_confidence_score(gear, &scored);
        scored
    }

    async fn persist_matches(&self, matches: &[ScoredMatch]) {
        for scored in matches {
            let record = MatchRecord::from_match(scored);
            if let Err(e) = self.match_repository.upsert_match_record(&record).await {
                tracing::warn!(
                    "Failed to persist match {} -> {}: {}",
                    record.gear_id,
                    record.case_id,
                    e
                );
            }
        }
    }
}

/// Order matches by the requested field
///
/// Ties fall back to compatibility score (descending), then case id.
/// A non-finite price sorts as infinitely expensive; a missing or
/// non-finite rating sorts as 0.
pub fn sort_matches(matches: &mut [ScoredMatch], field: SortField, order: SortOrder) {
    matches.sort_by(|a, b| {
        let primary = match field {
            SortField::CompatibilityScore => a.compatibility_score.cmp(&b.compatibility_score),
            SortField::Price => price_key(a).total_cmp(&price_key(b)),
            SortField::Rating => rating_key(a).total_cmp(&rating_key(b)),
        };
        let primary = match order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };

        primary
            .then_with(|| b.compatibility_score.cmp(&a.compatibility_score))
            .then_with(|| a.case.id.cmp(&b.case.id))
    });
}

#[inline]
fn price_key(scored: &ScoredMatch) -> f64 {
    if scored.case.price.is_finite() {
        scored.case.price
    } else {
        f64::INFINITY
    }
}

#[inline]
fn rating_key(scored: &ScoredMatch) -> f64 {
    scored.case.rating.filter(|r| r.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dimensions, LengthUnit, ProtectionLevel};
    use crate::services::InMemoryCatalog;

    fn create_gear() -> Gear {
        Gear {
            id: "synth-1".to_string(),
            category: "Synthesizer".to_string(),
            gear_type: "Polysynth".to_string(),
            brand: "Sequential".to_string(),
            name: "Prophet Rev2".to_string(),
            dimensions: Dimensions::new(20.0, 10.0, 5.0, LengthUnit::Inches),
            weight: None,
        }
    }

    fn create_case(id: &str, length: f64, level: ProtectionLevel, price: f64, rating: Option<f64>) -> Case {
        Case {
            id: id.to_string(),
            brand: "Gator".to_string(),
            name: format!("Case {}", id),
            description: None,
            internal_dimensions: Dimensions::new(length, 12.0, 6.0, LengthUnit::Inches),
            weight: None,
            protection_level: level,
            waterproof: false,
            shockproof: false,
            has_handle: true,
            has_wheels: false,
            material: None,
            color: None,
            features: vec!["padded".to_string()],
            price,
            currency: "USD".to_string(),
            rating,
            review_count: 3,
        }
    }

    fn matcher(cases: Vec<Case>) -> (ProductMatcher, Arc<InMemoryCatalog>) {
        let store = Arc::new(InMemoryCatalog::new(vec![create_gear()], cases));
        (ProductMatcher::from_store(store.clone(), ScoringWeights::default()), store)
    }

    #[tokio::test]
    async fn test_find_by_id_and_persist() {
        let (matcher, store) = matcher(vec![
            create_case("a", 24.0, ProtectionLevel::High, 150.0, Some(4.5)),
            create_case("b", 22.0, ProtectionLevel::Medium, 90.0, Some(4.0)),
        ]);

        let matches = matcher
            .find_compatible_cases("synth-1", &MatchOptions::default())
            .await
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].case.id, "a");
        assert!(matches.iter().all(|m| m.recommendation_type == RecommendationType::Primary));
        assert_eq!(store.record_count().await, 2);
    }

    #[tokio::test]
    async fn test_unknown_gear_is_not_found() {
        let (matcher, _) = matcher(vec![]);

        let result = matcher.find_compatible_cases("missing", &MatchOptions::default()).await;

        assert!(matches!(result, Err(MatchError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_min_score_cut() {
        let (matcher, _) = matcher(vec![
            create_case("good", 24.0, ProtectionLevel::High, 150.0, Some(4.5)),
            create_case("loose", 80.0, ProtectionLevel::Low, 150.0, None),
        ]);
        let options = MatchOptions {
            min_compatibility_score: 80,
            ..MatchOptions::default()
        };

        let matches = matcher.find_compatible_cases(create_gear(), &options).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].case.id, "good");
    }

    #[test]
    fn test_sort_by_price_ascending_and_limit() {
        let (matcher, _) = matcher(vec![]);
        let candidates = vec![
            create_case("mid", 24.0, ProtectionLevel::High, 150.0, Some(4.0)),
            create_case("cheap", 24.0, ProtectionLevel::High, 95.0, Some(4.0)),
            create_case("dear", 24.0, ProtectionLevel::High, 300.0, Some(4.0)),
        ];
        let options = MatchOptions {
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            max_results: 2,
            ..MatchOptions::default()
        };

        let ranked = matcher.rank_candidates(&create_gear(), candidates, &options);

        let ids: Vec<&str> = ranked.iter().map(|m| m.case.id.as_str()).collect();
        assert_eq!(ids, vec!["cheap", "mid"]);
    }

    #[test]
    fn test_sort_by_rating_descending() {
        let (matcher, _) = matcher(vec![]);
        let candidates = vec![
            create_case("ok", 24.0, ProtectionLevel::High, 150.0, Some(3.9)),
            create_case("best", 24.0, ProtectionLevel::High, 150.0, Some(4.9)),
        ];
        let options = MatchOptions {
            sort_by: SortField::Rating,
            min_compatibility_score: 0,
            ..MatchOptions::default()
        };

        let ranked = matcher.rank_candidates(&create_gear(), candidates, &options);

        assert_eq!(ranked[0].case.id, "best");
    }

    #[test]
    fn test_sort_tolerates_non_finite_prices_and_ratings() {
        let (matcher, _) = matcher(vec![]);
        let candidates: Vec<Case> = (0..64)
            .map(|i| {
                let price = match i % 4 {
                    0 => f64::NAN,
                    1 => f64::INFINITY,
                    _ => 50.0 + i as f64,
                };
                let rating = match i % 5 {
                    0 => Some(f64::NAN),
                    1 => None,
                    _ => Some(3.0 + (i % 3) as f64 * 0.5),
                };
                create_case(&format!("c{:02}", i), 24.0, ProtectionLevel::High, price, rating)
            })
            .collect();

        let by_price = MatchOptions {
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            min_compatibility_score: 0,
            max_results: 100,
            ..MatchOptions::default()
        };
        let ranked = matcher.rank_candidates(&create_gear(), candidates.clone(), &by_price);

        assert_eq!(ranked.len(), 64);
        let finite: Vec<f64> = ranked
            .iter()
            .map(|m| m.case.price)
            .take_while(|p| p.is_finite())
            .collect();
        assert_eq!(finite.len(), 32);
        assert!(finite.windows(2).all(|w| w[0] <= w[1]));
        assert!(ranked[32..].iter().all(|m| !m.case.price.is_finite()));

        let by_rating = MatchOptions {
            sort_by: SortField::Rating,
            ..by_price
        };
        let ranked = matcher.rank_candidates(&create_gear(), candidates, &by_rating);

        assert_eq!(ranked.len(), 64);
        let keys: Vec<f64> = ranked
            .iter()
            .map(|m| m.case.rating.filter(|r| r.is_finite()).unwrap_or(0.0))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_matcher_keeps_configured_weights() {
        let store = Arc::new(InMemoryCatalog::default());
        let weights = ScoringWeights {
            dimension: 0.5,
            protection: 0.2,
            features: 0.2,
            rating: 0.1,
        };

        let matcher = ProductMatcher::from_store(store, weights);

        assert_eq!(matcher.weights(), &weights);
    }

    #[test]
    fn test_unpriced_match_records_as_budget() {
        let (matcher, _) = matcher(vec![]);
        let case = create_case("nan", 24.0, ProtectionLevel::High, f64::NAN, Some(4.0));

        let scored = matcher.score_case(&create_gear(), case, &MatchOptions::default());
        let record = MatchRecord::from_match(&scored);

        assert_eq!(record.price_category, crate::models::PriceCategory::Budget);
    }

    #[test]
    fn test_scores_stay_in_range() {
        let (matcher, _) = matcher(vec![]);
        let options = MatchOptions {
            min_compatibility_score: 0,
            ..MatchOptions::default()
        };
        let candidates = vec![
            create_case("zero", 0.0, ProtectionLevel::Low, f64::NAN, Some(f64::INFINITY)),
            create_case("huge", 500.0, ProtectionLevel::High, 10.0, Some(9.0)),
            create_case("tight", 20.6, ProtectionLevel::Medium, 10.0, None),
        ];

        for scored in matcher.rank_candidates(&create_gear(), candidates, &options) {
            assert!(scored.compatibility_score <= 100);
            assert!(scored.confidence_score <= 100);
        }
    }
}
