//! Casefit - Matching and recommendation engine for audio gear protective cases
//!
//! This library scores how well a protective case holds a piece of audio gear
//! (physical fit, protection tier, requested features and customer rating),
//! ranks catalog cases by that score, and derives budget, premium and
//! alternative-size recommendations around a chosen match.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    calculate_compatibility_score, calculate_confidence_score, calculate_dimension_fit,
    match_features, MatchError, ProductMatcher, RecommendationEngine,
};
pub use models::{
    Case, Dimensions, FeatureOptions, Gear, LengthUnit, MatchOptions, ProtectionLevel,
    RecommendationOptions, ScoredMatch, ScoringWeights,
};
