// Integration tests for casefit

use async_trait::async_trait;
use casefit::core::{match_features, MatchError, ProductMatcher, RecommendationEngine};
use casefit::models::{
    Case, Dimensions, FeatureOptions, Gear, LengthUnit, MatchOptions, MatchRecord, ProtectionLevel,
    RecommendationOptions, RecommendationType, ScoringWeights, SortField, SortOrder,
};
use casefit::services::{InMemoryCatalog, MatchRepository, RepositoryError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Match repository whose writes always fail
#[derive(Default)]
struct FailingRepository {
    attempts: AtomicUsize,
}

#[async_trait]
impl MatchRepository for FailingRepository {
    async fn upsert_match_record(&self, _record: &MatchRecord) -> Result<(), RepositoryError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(RepositoryError::Unavailable("write rejected".to_string()))
    }

    async fn list_match_records(&self, _gear_id: &str) -> Result<Vec<MatchRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("read rejected".to_string()))
    }
}

fn create_gear() -> Gear {
    Gear {
        id: "synth-1".to_string(),
        category: "Synthesizer".to_string(),
        gear_type: "Analog Polysynth".to_string(),
        brand: "Moog".to_string(),
        name: "Subsequent 37".to_string(),
        dimensions: Dimensions::new(20.0, 10.0, 5.0, LengthUnit::Inches),
        weight: None,
    }
}

fn create_case(
    id: &str,
    brand: &str,
    dims: (f64, f64, f64),
    level: ProtectionLevel,
    price: f64,
    rating: Option<f64>,
) -> Case {
    Case {
        id: id.to_string(),
        brand: brand.to_string(),
        name: format!("Synth Case {}", id),
        description: Some("Padded interior with cable pocket".to_string()),
        internal_dimensions: Dimensions::new(dims.0, dims.1, dims.2, LengthUnit::Inches),
        weight: None,
        protection_level: level,
        waterproof: false,
        shockproof: true,
        has_handle: true,
        has_wheels: false,
        material: Some("Ballistic nylon".to_string()),
        color: Some("Black".to_string()),
        features: vec!["padded".to_string(), "handle".to_string()],
        price,
        currency: "USD".to_string(),
        rating,
        review_count: 12,
    }
}

/// A catalog spread over prices, tiers and sizes around a $150 primary
fn create_catalog() -> Vec<Case> {
    let mut cases = vec![
        create_case("primary", "Gator", (24.0, 12.0, 6.0), ProtectionLevel::High, 150.0, Some(4.5)),
        create_case("too-small", "Gator", (20.2, 12.0, 6.0), ProtectionLevel::High, 150.0, Some(5.0)),
    ];

    for i in 0..30 {
        let levels = [ProtectionLevel::Low, ProtectionLevel::Medium, ProtectionLevel::High];
        let brands = ["Gator", "SKB", "Pelican"];
        let grow = (i % 6) as f64;
        cases.push(create_case(
            &format!("case-{:02}", i),
            brands[i % 3],
            (23.0 + grow, 11.5 + grow / 2.0, 5.8 + grow / 3.0),
            levels[(i / 3) % 3],
            60.0 + i as f64 * 10.0,
            Some(3.5 + (i % 4) as f64 * 0.4),
        ));
    }

    cases
}

fn create_store() -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::new(vec![create_gear()], create_catalog()))
}

fn primary_match(matcher: &ProductMatcher) -> casefit::ScoredMatch {
    let primary = create_catalog()
        .into_iter()
        .find(|c| c.id == "primary")
        .expect("primary case in catalog");
    matcher.score_case(&create_gear(), primary, &MatchOptions::default())
}

#[tokio::test]
async fn test_end_to_end_find_compatible_cases() {
    let store = create_store();
    let matcher = ProductMatcher::from_store(store.clone(), ScoringWeights::default());

    let matches = matcher
        .find_compatible_cases("synth-1", &MatchOptions::default())
        .await
        .unwrap();

    assert!(!matches.is_empty());
    assert!(matches.len() <= 20);
    assert!(matches.iter().all(|m| m.case.id != "too-small"));
    assert!(matches.iter().all(|m| m.compatibility_score >= 70));

    for pair in matches.windows(2) {
        assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
    }

    assert_eq!(store.record_count().await, matches.len());
    let history = store.list_match_records("synth-1").await.unwrap();
    assert_eq!(history.len(), matches.len());
}

#[tokio::test]
async fn test_repeated_search_upserts_same_records() {
    let store = create_store();
    let matcher = ProductMatcher::from_store(store.clone(), ScoringWeights::default());

    let first = matcher.find_compatible_cases("synth-1", &MatchOptions::default()).await.unwrap();
    let second = matcher.find_compatible_cases("synth-1", &MatchOptions::default()).await.unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(store.record_count().await, first.len());
}

#[tokio::test]
async fn test_persistence_failure_does_not_fail_search() {
    let store = create_store();
    let failing = Arc::new(FailingRepository::default());
    let matcher = ProductMatcher::new(store.clone(), store, failing.clone(), ScoringWeights::default());

    let matches = matcher
        .find_compatible_cases(create_gear(), &MatchOptions::default())
        .await
        .unwrap();

    assert!(!matches.is_empty());
    assert_eq!(failing.attempts.load(Ordering::SeqCst), matches.len());
}

#[tokio::test]
async fn test_price_sort_and_filters() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());
    let options = MatchOptions {
        sort_by: SortField::Price,
        sort_order: SortOrder::Asc,
        min_price: Some(100.0),
        max_price: Some(250.0),
        brands: vec!["skb".to_string()],
        min_compatibility_score: 0,
        ..MatchOptions::default()
    };

    let matches = matcher.find_compatible_cases("synth-1", &options).await.unwrap();

    assert!(!matches.is_empty());
    for m in &matches {
        assert_eq!(m.case.brand, "SKB");
        assert!(m.case.price >= 100.0 && m.case.price <= 250.0);
    }
    for pair in matches.windows(2) {
        assert!(pair[0].case.price <= pair[1].case.price);
    }
}

#[tokio::test]
async fn test_unknown_gear_id() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());

    let result = matcher.find_compatible_cases("missing", &MatchOptions::default()).await;

    assert!(matches!(result, Err(MatchError::NotFound(_))));
}

#[tokio::test]
async fn test_budget_never_at_or_above_primary_price() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());
    let engine = RecommendationEngine::new(matcher.clone());
    let primary = primary_match(&matcher);

    let budget = engine.find_budget_alternatives(&create_gear(), &primary).await.unwrap();

    assert!(budget.len() <= 3);
    for m in &budget {
        assert!(m.case.price < primary.case.price);
        assert!(m.case.price >= primary.case.price * 0.6);
        assert_eq!(m.case.protection_level, primary.case.protection_level);
    }
    for pair in budget.windows(2) {
        assert!(pair[0].case.price <= pair[1].case.price);
    }
}

#[tokio::test]
async fn test_premium_never_below_floor() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());
    let engine = RecommendationEngine::new(matcher.clone());
    let mut primary = primary_match(&matcher);
    primary.case.protection_level = ProtectionLevel::Medium;

    let premium = engine
        .find_premium_upgrades(&create_gear(), &primary, 50.0)
        .await
        .unwrap();

    assert!(!premium.is_empty());
    assert!(premium.len() <= 3);
    for m in &premium {
        assert!(m.case.price >= primary.case.price * 1.1);
        assert!(m.case.price <= primary.case.price * 1.5);
        assert_eq!(m.case.protection_level, ProtectionLevel::High);
    }
}

#[tokio::test]
async fn test_size_alternatives_differ_from_primary() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());
    let engine = RecommendationEngine::new(matcher.clone());
    let primary = primary_match(&matcher);

    let sizes = engine.find_size_alternatives(&create_gear(), &primary).await.unwrap();

    let reference = primary.case.internal_dimensions.axes();
    for m in &sizes {
        assert_ne!(m.case.id, primary.case.id);
        let differs = m
            .case
            .internal_dimensions
            .axes()
            .iter()
            .zip(reference.iter())
            .any(|(a, b)| (a - b).abs() / b > 0.2);
        assert!(differs, "case {} is not a different size", m.case.id);
    }
}

#[tokio::test]
async fn test_generate_alternative_recommendations() {
    let matcher = ProductMatcher::from_store(create_store(), ScoringWeights::default());
    let engine = RecommendationEngine::new(matcher.clone());
    let primary = primary_match(&matcher);
    let options = RecommendationOptions {
        exclude_brands: vec!["Pelican".to_string()],
        ..RecommendationOptions::default()
    };

    let recommendations = engine
        .generate_alternative_recommendations(&create_gear(), &primary, &options)
        .await
        .unwrap();

    assert!(recommendations.len() <= 5);
    for m in &recommendations {
        assert_ne!(m.recommendation_type, RecommendationType::Primary);
        assert_ne!(m.case.brand, "Pelican");
    }
    for pair in recommendations.windows(2) {
        assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
    }
}

#[test]
fn test_feature_ranking_is_independent_of_catalog() {
    let gear = create_gear();
    let mut plain = create_case("plain", "SKB", (24.0, 12.0, 6.0), ProtectionLevel::High, 150.0, None);
    plain.description = None;
    plain.features = vec![];
    plain.has_handle = false;
    let padded = create_case("padded", "Gator", (24.0, 12.0, 6.0), ProtectionLevel::High, 150.0, None);

    let options = FeatureOptions {
        require_padding: true,
        require_handle: true,
        ..FeatureOptions::default()
    };

    let ranked = match_features(&gear, vec![plain, padded], &options);

    assert_eq!(ranked[0].case.id, "padded");
    assert_eq!(ranked[0].feature_score, 100);
    assert_eq!(ranked[1].feature_score, 33);
}
