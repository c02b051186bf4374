use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::domain::{Case, Gear, ScoredMatch};
use super::options::{FeatureOptions, MatchOptions, RecommendationOptions};

/// Gear supplied inline or by catalog id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GearRef {
    Id(String),
    Gear(Box<Gear>),
}

impl From<Gear> for GearRef {
    fn from(gear: Gear) -> Self {
        GearRef::Gear(Box::new(gear))
    }
}

impl From<&str> for GearRef {
    fn from(id: &str) -> Self {
        GearRef::Id(id.to_string())
    }
}

/// Request to find compatible cases
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_gear_source"))]
pub struct FindCasesRequest {
    #[serde(alias = "gear_id", rename = "gearId", default)]
    pub gear_id: Option<String>,
    #[serde(default)]
    pub gear: Option<Gear>,
    /// Omitted options fall back to the service's configured defaults
    #[serde(default)]
    pub options: Option<MatchOptions>,
}

impl FindCasesRequest {
    pub fn gear_ref(&self) -> Option<GearRef> {
        match (&self.gear, &self.gear_id) {
            (Some(gear), _) => Some(GearRef::from(gear.clone())),
            (None, Some(id)) => Some(GearRef::Id(id.clone())),
            (None, None) => None,
        }
    }
}

fn validate_gear_source(req: &FindCasesRequest) -> Result<(), ValidationError> {
    match (&req.gear, &req.gear_id) {
        (None, None) => Err(ValidationError::new("gear_or_gear_id_required")),
        (None, Some(id)) if id.trim().is_empty() => Err(ValidationError::new("gear_id_empty")),
        _ => Ok(()),
    }
}

/// Request for alternatives around a chosen primary match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendationsRequest {
    pub gear: Gear,
    #[serde(rename = "primaryMatch")]
    pub primary_match: ScoredMatch,
    #[serde(default)]
    pub options: Option<RecommendationOptions>,
}

/// Request for a confidence estimate of one match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfidenceRequest {
    pub gear: Gear,
    #[serde(rename = "match")]
    pub scored_match: ScoredMatch,
}

/// Request to rank arbitrary cases by qualitative fit
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchFeaturesRequest {
    pub gear: Gear,
    #[validate(length(min = 1))]
    pub cases: Vec<Case>,
    #[serde(default)]
    pub options: FeatureOptions,
}
