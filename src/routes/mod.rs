// Route exports
pub mod interviews;
pub mod processing;
pub mod scores;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::core::ContentProcessor;
use crate::models::ErrorResponse;
use crate::services::Store;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub processor: ContentProcessor,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .service(
            web::scope("/api/v1")
                .configure(processing::configure)
                .configure(interviews::configure)
                .configure(scores::configure),
        );
}

/// JSON error body with the matching status
pub(crate) fn error_response(status: StatusCode, error: &str, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
        status_code: status.as_u16(),
    })
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    let response = error_response(StatusCode::BAD_REQUEST, "不正なリクエストです", format!("Invalid JSON: {}", err));
    error::InternalError::from_response(err, response).into()
}

/// Handle query payload errors
fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    let response = error_response(StatusCode::BAD_REQUEST, "不正なクエリです", format!("Invalid query: {}", err));
    error::InternalError::from_response(err, response).into()
}
