use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::{MatchingSettings, RecommendationSettings};
use crate::core::{match_features, MatchError, ProductMatcher, RecommendationEngine};
use crate::models::{
    ConfidenceRequest, ConfidenceResponse, ErrorResponse, FindCasesRequest, FindCasesResponse,
    HealthResponse, MatchFeaturesRequest, MatchFeaturesResponse, MatchHistoryResponse,
    RecommendationsRequest, RecommendationsResponse,
};
use crate::services::PostgresClient;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Checked by the health endpoint when the service runs against PostgreSQL
    pub postgres: Option<Arc<PostgresClient>>,
    pub matcher: ProductMatcher,
    pub engine: RecommendationEngine,
    pub matching: MatchingSettings,
    pub recommendations: RecommendationSettings,
}

impl AppState {
    pub fn new(
        postgres: Option<Arc<PostgresClient>>,
        matcher: ProductMatcher,
        matching: MatchingSettings,
        recommendations: RecommendationSettings,
    ) -> Self {
        Self {
            postgres,
            engine: RecommendationEngine::new(matcher.clone()),
            matcher,
            matching,
            recommendations,
        }
    }
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_cases))
        .route("/matches/recommendations", web::post().to(recommendations))
        .route("/matches/confidence", web::post().to(confidence))
        .route("/matches/history", web::get().to(match_history))
        .route("/features/match", web::post().to(feature_match));
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

fn match_error_response(context: &str, err: MatchError) -> HttpResponse {
    match err {
        MatchError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Gear not found".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        MatchError::Repository(_) => {
            tracing::error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match &state.postgres {
        Some(postgres) => postgres.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find compatible cases endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "gearId": "string",
///   "options": { "minCompatibilityScore": 70, "maxResults": 20, "sortBy": "price" }
/// }
/// ```
/// `gear` may be sent inline instead of `gearId`.
async fn find_cases(
    state: web::Data<AppState>,
    req: web::Json<FindCasesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_cases request: {:?}", errors);
        return validation_failed(errors);
    }

    let Some(gear) = req.gear_ref() else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "gear or gearId is required".to_string(),
            status_code: 400,
        });
    };

    let mut options = req
        .options
        .clone()
        .unwrap_or_else(|| state.matching.match_options());
    options.max_results = options.max_results.min(state.matching.max_results_cap);

    match state.matcher.find_compatible_cases(gear, &options).await {
        Ok(matches) => HttpResponse::Ok().json(FindCasesResponse {
            total_results: matches.len(),
            matches,
        }),
        Err(e) => match_error_response("Failed to find compatible cases", e),
    }
}

/// Alternative recommendations endpoint
///
/// POST /api/v1/matches/recommendations
async fn recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationsRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let options = req
        .options
        .unwrap_or_else(|| state.recommendations.recommendation_options());

    let confidence_score = state
        .engine
        .calculate_confidence_score(&req.gear, &req.primary_match);

    match state
        .engine
        .generate_alternative_recommendations(&req.gear, &req.primary_match, &options)
        .await
    {
        Ok(recommendations) => HttpResponse::Ok().json(RecommendationsResponse {
            recommendations,
            confidence_score,
        }),
        Err(e) => match_error_response("Failed to generate recommendations", e),
    }
}

/// Confidence estimate endpoint
///
/// POST /api/v1/matches/confidence
async fn confidence(
    state: web::Data<AppState>,
    req: web::Json<ConfidenceRequest>,
) -> impl Responder {
    let confidence_score = state
        .engine
        .calculate_confidence_score(&req.gear, &req.scored_match);

    HttpResponse::Ok().json(ConfidenceResponse { confidence_score })
}

/// Feature ranking endpoint
///
/// POST /api/v1/features/match
async fn feature_match(req: web::Json<MatchFeaturesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for feature_match request: {:?}", errors);
        return validation_failed(errors);
    }

    let req = req.into_inner();
    let cases = match_features(&req.gear, req.cases, &req.options);

    HttpResponse::Ok().json(MatchFeaturesResponse { cases })
}

/// Stored match records for a piece of gear, newest first
///
/// GET /api/v1/matches/history?gearId=...
async fn match_history(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let gear_id = match query.get("gearId") {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing gearId parameter".to_string(),
                message: "gearId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.matcher.match_repository().list_match_records(gear_id).await {
        Ok(records) => HttpResponse::Ok().json(MatchHistoryResponse {
            gear_id: gear_id.clone(),
            records,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch match history for {}: {}", gear_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch match history".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
