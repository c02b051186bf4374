// Route exports
pub mod matches;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::models::ErrorResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure),
    );
}

/// Extractor rejection rendered with the same body as handler errors
#[derive(Debug)]
pub struct PayloadRejection(pub ErrorResponse);

impl std::fmt::Display for PayloadRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl error::ResponseError for PayloadRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

fn rejection(error: &str, message: String) -> actix_web::Error {
    PayloadRejection(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
    .into()
}

/// Turn malformed JSON bodies into a 400 `ErrorResponse`
pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected JSON body on {}: {}", req.path(), err);
    rejection("Invalid JSON", err.to_string())
}

/// Turn malformed query strings into a 400 `ErrorResponse`
pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Rejected query string on {}: {}", req.path(), err);
    rejection("Invalid query", err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_rejection_uses_status_from_body() {
        let rejection = PayloadRejection(ErrorResponse {
            error: "Invalid JSON".to_string(),
            message: "EOF while parsing".to_string(),
            status_code: 400,
        });

        assert_eq!(rejection.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(rejection.to_string(), "Invalid JSON: EOF while parsing");
    }
}
