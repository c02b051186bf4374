use serde::{Deserialize, Serialize};
use crate::core::FeatureMatch;
use crate::models::domain::{MatchRecord, ScoredMatch};

/// Response for the find cases endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCasesResponse {
    pub matches: Vec<ScoredMatch>,
    pub total_results: usize,
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<ScoredMatch>,
    pub confidence_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceResponse {
    pub confidence_score: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchFeaturesResponse {
    pub cases: Vec<FeatureMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchHistoryResponse {
    pub gear_id: String,
    pub records: Vec<MatchRecord>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
