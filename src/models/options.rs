use serde::{Deserialize, Serialize};

use super::domain::{ProtectionLevel, SortField, SortOrder};

pub const DEFAULT_MIN_COMPATIBILITY_SCORE: u8 = 70;
pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const DEFAULT_MAX_ALTERNATIVES: usize = 5;
pub const DEFAULT_MAX_PRICE_DIFFERENCE_PERCENT: f64 = 50.0;

/// Options for a compatible-case search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    pub min_compatibility_score: u8,
    pub max_results: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub protection_level: Option<ProtectionLevel>,
    pub waterproof: Option<bool>,
    pub shockproof: Option<bool>,
    pub require_handle: bool,
    pub require_wheels: bool,
    pub brands: Vec<String>,
    pub preferred_features: Vec<String>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_compatibility_score: DEFAULT_MIN_COMPATIBILITY_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            min_price: None,
            max_price: None,
            protection_level: None,
            waterproof: None,
            shockproof: None,
            require_handle: false,
            require_wheels: false,
            brands: Vec::new(),
            preferred_features: Vec::new(),
        }
    }
}

/// Qualitative requirements for the feature matcher
///
/// Every enabled flag or non-empty list becomes one equally weighted factor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureOptions {
    pub require_waterproof: bool,
    pub require_shockproof: bool,
    pub require_handle: bool,
    pub require_wheels: bool,
    pub require_padding: bool,
    pub require_compartments: bool,
    pub preferred_material: Vec<String>,
    pub preferred_color: Vec<String>,
}

/// Options for alternative recommendations around a primary match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationOptions {
    pub max_alternatives: usize,
    pub max_price_difference_percent: f64,
    pub include_budget: bool,
    pub include_premium: bool,
    pub include_alternative_sizes: bool,
    pub include_brands: Vec<String>,
    pub exclude_brands: Vec<String>,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            max_price_difference_percent: DEFAULT_MAX_PRICE_DIFFERENCE_PERCENT,
            include_budget: true,
            include_premium: true,
            include_alternative_sizes: true,
            include_brands: Vec::new(),
            exclude_brands: Vec::new(),
        }
    }
}
