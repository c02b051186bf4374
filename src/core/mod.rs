// Core algorithm exports
pub mod confidence;
pub mod dimensions;
pub mod features;
pub mod filters;
pub mod keywords;
pub mod matcher;
pub mod protection;
pub mod recommendations;
pub mod scoring;

pub use confidence::calculate_confidence_score;
pub use dimensions::{calculate_dimension_fit, dimension_score, grade_overall_fit};
pub use features::{calculate_feature_score, match_features, FeatureMatch};
pub use filters::{build_case_filter, matches_case_filter, passes_brand_lists};
pub use matcher::{sort_matches, MatchError, ProductMatcher};
pub use protection::{protection_match_score, recommended_protection};
pub use recommendations::RecommendationEngine;
pub use scoring::{calculate_compatibility_score, CompatibilityBreakdown};
