use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    CreateInterviewRequest, InterviewRequestFilter, InterviewRequestListResponse,
    InterviewRequestResponse, MessageResponse, NewInterviewRequest, UpdateInterviewRequest,
};
use crate::routes::{error_response, AppState};

const NOT_FOUND: &str = "インタビュー依頼が見つかりません";

/// Configure interview request routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/interview-requests", web::post().to(create_interview_request))
        .route("/interview-requests", web::get().to(list_interview_requests))
        .route("/interview-requests/{id}", web::get().to(get_interview_request))
        .route("/interview-requests/{id}", web::put().to(update_interview_request))
        .route("/interview-requests/{id}", web::delete().to(delete_interview_request));
}

fn not_found(id: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        NOT_FOUND,
        format!("Interview request {} does not exist", id),
    )
}

/// Ids that are not UUIDs cannot exist, so they map to 404
fn parse_id(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw).map_err(|_| not_found(raw))
}

/// Draft and store an interview request
///
/// POST /api/v1/interview-requests
///
/// Request body:
/// ```json
/// {
///   "reporterId": "string",
///   "contentId": "string",
///   "tone": "FORMAL|CASUAL|URGENT"
/// }
/// ```
///
/// A stored matching score is reused; otherwise one is computed and stored.
async fn create_interview_request(
    state: web::Data<AppState>,
    req: web::Json<CreateInterviewRequest>,
) -> impl Responder {
    const FAILED: &str = "インタビュー依頼の作成に失敗しました";

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "記者IDとコンテンツIDが必要です", errors);
    }

    let (reporter, content) = match tokio::try_join!(
        state.store.get_reporter(&req.reporter_id),
        state.store.get_content(&req.content_id),
    ) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!("Failed to load reporter/content: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e);
        }
    };

    let Some(reporter) = reporter else {
        return error_response(
            StatusCode::NOT_FOUND,
            "記者が見つかりません",
            format!("Reporter {} does not exist", req.reporter_id),
        );
    };
    let Some(content) = content else {
        return error_response(
            StatusCode::NOT_FOUND,
            "コンテンツが見つかりません",
            format!("Content {} does not exist", req.content_id),
        );
    };

    let score = match state.store.get_matching_score(&reporter.id, &content.id).await {
        Ok(Some(stored)) => stored.score,
        Ok(None) => {
            let result = state.processor.score(&reporter, &content).into_value();
            if let Err(e) = state.store.save_matching_scores(std::slice::from_ref(&result)).await {
                tracing::error!("Failed to store matching score: {}", e);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e);
            }
            result.score
        }
        Err(e) => {
            tracing::error!("Failed to fetch matching score: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e);
        }
    };

    tracing::info!("Drafting interview request: {} x {}", reporter.name, content.title);

    let draft = state.processor.interview_request(&reporter, &content, score).into_value();

    let created = state
        .store
        .create_interview_request(NewInterviewRequest {
            reporter_id: reporter.id.clone(),
            content_id: content.id.clone(),
            draft,
            tone: req.tone,
        })
        .await;

    match created {
        Ok(request) => {
            tracing::info!("Created interview request {}", request.id);
            HttpResponse::Ok().json(InterviewRequestResponse {
                data: request,
                message: Some("インタビュー依頼を作成しました".to_string()),
            })
        }
        Err(e) => {
            tracing::error!("Failed to store interview request: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILED, e)
        }
    }
}

/// List interview requests, newest first
///
/// GET /api/v1/interview-requests?contentId={id}&reporterId={id}&status={status}
async fn list_interview_requests(
    state: web::Data<AppState>,
    query: web::Query<InterviewRequestFilter>,
) -> impl Responder {
    match state.store.list_interview_requests(&query).await {
        Ok(data) => HttpResponse::Ok().json(InterviewRequestListResponse {
            count: data.len(),
            data,
        }),
        Err(e) => {
            tracing::error!("Failed to list interview requests: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "インタビュー依頼一覧の取得に失敗しました",
                e,
            )
        }
    }
}

/// Fetch one interview request
///
/// GET /api/v1/interview-requests/{id}
async fn get_interview_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.get_interview_request(id).await {
        Ok(Some(request)) => HttpResponse::Ok().json(InterviewRequestResponse {
            data: request,
            message: None,
        }),
        Ok(None) => not_found(&path),
        Err(e) => {
            tracing::error!("Failed to fetch interview request {}: {}", id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "インタビュー依頼の取得に失敗しました",
                e,
            )
        }
    }
}

/// Edit subject, body, status or tone of an interview request
///
/// PUT /api/v1/interview-requests/{id}
///
/// Request body (all fields optional):
/// ```json
/// {
///   "subject": "string",
///   "body": "string",
///   "status": "SENT",
///   "tone": "FORMAL|CASUAL|URGENT"
/// }
/// ```
async fn update_interview_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateInterviewRequest>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "不正な更新内容です", errors);
    }

    match state.store.update_interview_request(id, &req).await {
        Ok(Some(request)) => {
            tracing::info!("Updated interview request {} (status {})", id, request.status);
            HttpResponse::Ok().json(InterviewRequestResponse {
                data: request,
                message: Some("インタビュー依頼を更新しました".to_string()),
            })
        }
        Ok(None) => not_found(&path),
        Err(e) => {
            tracing::error!("Failed to update interview request {}: {}", id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "インタビュー依頼の更新に失敗しました",
                e,
            )
        }
    }
}

/// DELETE /api/v1/interview-requests/{id}
async fn delete_interview_request(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match parse_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.delete_interview_request(id).await {
        Ok(true) => {
            tracing::info!("Deleted interview request {}", id);
            HttpResponse::Ok().json(MessageResponse {
                message: "インタビュー依頼を削除しました".to_string(),
            })
        }
        Ok(false) => not_found(&path),
        Err(e) => {
            tracing::error!("Failed to delete interview request {}: {}", id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "インタビュー依頼の削除に失敗しました",
                e,
            )
        }
    }
}
