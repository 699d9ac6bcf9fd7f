use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    MatchingScoreListResponse, MatchingScoreQuery, Pagination, TopMatchesRequest,
    TopMatchesResponse,
};
use crate::routes::{error_response, AppState};

/// Configure matching score routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matching-scores", web::get().to(list_matching_scores))
        .route("/matching-scores", web::post().to(top_matches));
}

/// List stored matching scores with their reporter and content, highest first
///
/// GET /api/v1/matching-scores?contentId={id}&reporterId={id}&page=1&limit=10
async fn list_matching_scores(
    state: web::Data<AppState>,
    query: web::Query<MatchingScoreQuery>,
) -> impl Responder {
    match state.store.list_matching_scores(&query).await {
        Ok((data, total)) => {
            tracing::debug!("Fetched {} of {} matching scores", data.len(), total);
            HttpResponse::Ok().json(MatchingScoreListResponse {
                success: true,
                data,
                pagination: Pagination::new(query.page.max(1), query.capped_limit(), total),
            })
        }
        Err(e) => {
            tracing::error!("Failed to list matching scores: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "マッチングスコア取得中にエラーが発生しました",
                e,
            )
        }
    }
}

/// Best-scoring reporters for one content item
///
/// POST /api/v1/matching-scores
///
/// Request body:
/// ```json
/// { "contentId": "string", "topN": 5 }
/// ```
async fn top_matches(
    state: web::Data<AppState>,
    req: web::Json<TopMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "コンテンツIDが必要です", errors);
    }

    tracing::info!("Fetching top {} reporters for content {}", req.top_n, req.content_id);

    match state.store.top_matches(&req.content_id, req.top_n as usize).await {
        Ok(top_matches) => HttpResponse::Ok().json(TopMatchesResponse {
            success: true,
            content_id: req.content_id.clone(),
            message: format!("上位{}記者のマッチング情報を取得しました", top_matches.len()),
            top_matches,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch top matches for {}: {}", req.content_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "上位マッチング取得中にエラーが発生しました",
                e,
            )
        }
    }
}
