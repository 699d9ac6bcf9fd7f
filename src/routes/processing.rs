use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{HealthResponse, ProcessContentRequest, ProcessContentResponse, ProcessingSummary};
use crate::routes::{error_response, AppState};
use crate::services::StoreError;

const PROCESSING_FAILED: &str = "AI処理中にエラーが発生しました";

/// Configure health and pipeline routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ai/process-content", web::post().to(process_content));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run tagging, scoring and recommendation drafting for one content item
///
/// POST /api/v1/ai/process-content
///
/// Request body:
/// ```json
/// { "contentId": "string" }
/// ```
async fn process_content(
    state: web::Data<AppState>,
    req: web::Json<ProcessContentRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "コンテンツIDが必要です", errors);
    }

    let content_id = &req.content_id;
    tracing::info!("Processing content: {}", content_id);

    let content = match state.store.get_content(content_id).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                "コンテンツが見つかりません",
                format!("Content {} does not exist", content_id),
            );
        }
        Err(e) => {
            tracing::error!("Failed to fetch content {}: {}", content_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED, e);
        }
    };

    let reporters = match state.store.list_reporters().await {
        Ok(reporters) => reporters,
        Err(e) => {
            tracing::error!("Failed to fetch reporters: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED, e);
        }
    };

    let outcome = match state.processor.process(&content, &reporters) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Processing failed for {}: {}", content_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED, e);
        }
    };

    let saved: Result<(), StoreError> = async {
        state.store.save_tags(&content.id, &outcome.tags).await?;
        state.store.save_matching_scores(&outcome.matching_results).await?;
        state
            .store
            .save_recommendations(&content.id, &outcome.recommendations)
            .await
    }
    .await;

    if let Err(e) = saved {
        tracing::error!("Failed to persist results for {}: {}", content_id, e);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, PROCESSING_FAILED, e);
    }

    let threshold = state.processor.rules().recommendation_threshold;
    let results = ProcessingSummary {
        content_id: content.id.clone(),
        content_title: content.title.clone(),
        tags_generated: outcome.tags.len(),
        matching_scores: outcome.matching_results.len(),
        recommendations: outcome.recommendations.len(),
        high_score_reporters: outcome
            .matching_results
            .iter()
            .filter(|r| r.score >= threshold)
            .count(),
    };

    tracing::info!(
        "Stored {} tags, {} scores, {} recommendations for {}",
        results.tags_generated,
        results.matching_scores,
        results.recommendations,
        content_id
    );

    HttpResponse::Ok().json(ProcessContentResponse {
        success: true,
        message: "AI処理が完了しました".to_string(),
        results,
        data: outcome,
    })
}
