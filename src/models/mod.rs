// Model exports
pub mod domain;
pub mod options;
pub mod requests;
pub mod responses;

pub use domain::{
    Case, CaseFilter, Dimensions, DimensionFit, Gear, GearCategory, LengthUnit, MassUnit,
    MatchRecord, PriceCategory, ProtectionLevel, RecommendationType, ScoredMatch, ScoringWeights,
    SortField, SortOrder, Weight,
};
pub use options::{FeatureOptions, MatchOptions, RecommendationOptions};
pub use requests::{ConfidenceRequest, FindCasesRequest, GearRef, MatchFeaturesRequest, RecommendationsRequest};
pub use responses::{
    ConfidenceResponse, ErrorResponse, FindCasesResponse, HealthResponse, MatchFeaturesResponse,
    MatchHistoryResponse, RecommendationsResponse,
};
