// Integration tests for Press Match

use actix_web::{http::StatusCode, test, web, App};
use serde_json::json;
use std::sync::Arc;

use press_match::core::{ContentProcessor, FixedJitter, ThreadJitter};
use press_match::models::{
    ContentProfile, ContentStatus, DraftTone, ErrorResponse, HealthResponse,
    InterviewRequestListResponse, InterviewRequestResponse, MatchingRules,
    MatchingScoreListResponse, MessageResponse, Pagination, ProcessContentResponse,
    ReporterProfile, TopMatchesResponse,
};
use press_match::routes::{self, AppState};
use press_match::services::{MemoryStore, Store};

fn create_reporter(id: &str, name: &str, company: &str) -> ReporterProfile {
    ReporterProfile {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
        company: company.to_string(),
        social_media: None,
    }
}

fn create_content() -> ContentProfile {
    ContentProfile {
        id: "c1".to_string(),
        title: "AIとDXの新システム".to_string(),
        summary: "クラウドで提供".to_string(),
        body: "本文".to_string(),
        status: ContentStatus::Published,
    }
}

fn create_reporters() -> Vec<ReporterProfile> {
    vec![
        create_reporter("r1", "山田 花子", "日経新聞"),       // no overlap
        create_reporter("r2", "鈴木 一郎", "クラウド通信"),   // one overlap
        create_reporter("r3", "田中 拓也", "AI・DX Times"), // two overlaps
    ]
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    for reporter in create_reporters() {
        store.insert_reporter(reporter).await;
    }
    store.insert_content(create_content()).await;
    store
}

fn fixed_processor(jitter: f64) -> ContentProcessor {
    ContentProcessor::new(MatchingRules::default(), Arc::new(FixedJitter(jitter)))
}

fn app_state(store: Arc<MemoryStore>, processor: ContentProcessor) -> web::Data<AppState> {
    let store: Arc<dyn Store> = store;
    web::Data::new(AppState { store, processor })
}

#[::std::prelude::v1::test]
fn test_integration_end_to_end_processing() {
    let processor = fixed_processor(0.1);

    let outcome = processor.process(&create_content(), &create_reporters()).unwrap();

    let tag_names: Vec<&str> = outcome.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, vec!["AI・機械学習", "IT業界", "DX・デジタル変革"]);

    let scores: Vec<f64> = outcome.matching_results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![61.0, 76.0, 91.0]);

    assert_eq!(outcome.recommendations.len(), 2);
    let urgent = &outcome.recommendations[1].draft;
    assert_eq!(urgent.tone, DraftTone::Urgent);
    assert_eq!(urgent.subject, "【緊急】メディア様向け - AIとDXの新システムについて");
}

#[::std::prelude::v1::test]
fn test_integration_random_jitter_ranges() {
    let processor = ContentProcessor::new(MatchingRules::default(), Arc::new(ThreadJitter));
    let reporters = create_reporters();

    for _ in 0..50 {
        let outcome = processor.process(&create_content(), &reporters).unwrap();
        let scores: Vec<f64> = outcome.matching_results.iter().map(|r| r.score).collect();

        assert!((60.0..=70.0).contains(&scores[0]), "r1 score {}", scores[0]);
        assert!((75.0..=85.0).contains(&scores[1]), "r2 score {}", scores[1]);
        assert!((90.0..=100.0).contains(&scores[2]), "r3 score {}", scores[2]);

        // r2 and r3 always clear the threshold, r1 never does
        assert_eq!(outcome.recommendations.len(), 2);
    }
}

#[::std::prelude::v1::test]
fn test_integration_empty_reporter_batch() {
    let outcome = fixed_processor(0.5).process(&create_content(), &[]).unwrap();

    assert_eq!(outcome.tags.len(), 3);
    assert!(outcome.matching_results.is_empty());
    assert!(outcome.recommendations.is_empty());
}

#[::std::prelude::v1::test]
fn test_integration_repeat_generation_is_stable() {
    let processor = ContentProcessor::new(MatchingRules::default(), Arc::new(ThreadJitter));
    let content = create_content();

    assert_eq!(
        processor.suggest_tags(&content).into_value(),
        processor.suggest_tags(&content).into_value()
    );

    for (reporter, base) in create_reporters().into_iter().zip([60.0, 75.0, 90.0]) {
        let first = processor.score(&reporter, &content).into_value();
        let second = processor.score(&reporter, &content).into_value();

        // Only the jitter differs between runs
        assert_eq!(first.reasons, second.reasons);
        assert!((first.score - second.score).abs() <= 10.0);
        for score in [first.score, second.score] {
            assert!((base..=base + 10.0).contains(&score), "score {} for base {}", score, base);
        }

        assert_eq!(
            processor.recommend(&reporter, &content, first.score).into_value(),
            processor.recommend(&reporter, &content, first.score).into_value()
        );
        assert_eq!(
            processor.interview_request(&reporter, &content, first.score).into_value(),
            processor.interview_request(&reporter, &content, first.score).into_value()
        );
    }
}

#[actix_web::test]
async fn test_health_endpoint() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "healthy");
}

#[actix_web::test]
async fn test_health_endpoint_degraded_on_store_error() {
    let store = seeded_store().await;
    store.set_available(false);
    let app = test::init_service(
        App::new()
            .app_data(app_state(store.clone(), fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(body.status, "degraded");

    store.set_available(true);
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.status, "healthy");
}

#[actix_web::test]
async fn test_process_content_persists_results() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store.clone(), fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "c1" }))
        .to_request();
    let body: ProcessContentResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.success);
    assert_eq!(body.results.content_id, "c1");
    assert_eq!(body.results.tags_generated, 3);
    assert_eq!(body.results.matching_scores, 3);
    assert_eq!(body.results.recommendations, 2);
    assert_eq!(body.results.high_score_reporters, 2);

    let tags = store.content_tags("c1").await;
    assert_eq!(tags.len(), 3);
    assert!(tags.contains(&("AI・機械学習".to_string(), 0.95)));

    let stored = store.get_matching_score("r3", "c1").await.unwrap().unwrap();
    assert_eq!(stored.score, 91.0);

    let recommendations = store.recommendations("c1").await;
    let ids: Vec<&str> = recommendations.iter().map(|r| r.reporter_id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r3"]);
}

#[actix_web::test]
async fn test_process_content_rerun_overwrites_scores() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store.clone(), fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/ai/process-content")
            .set_json(json!({ "contentId": "c1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let (scores, total) = store
        .list_matching_scores(&Default::default())
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(scores.len(), 3);
    assert_eq!(store.content_tags("c1").await.len(), 3);
}

#[actix_web::test]
async fn test_process_content_validation() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "missing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "コンテンツが見つかりません");
    assert_eq!(body.status_code, 404);
}

#[actix_web::test]
async fn test_malformed_json_is_rejected() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_matching_scores_pagination() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "c1" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/matching-scores?contentId=c1&limit=2")
        .to_request();
    let body: MatchingScoreListResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.success);
    assert_eq!(body.pagination, Pagination { page: 1, limit: 2, total: 3, total_pages: 2 });
    let scores: Vec<f64> = body.data.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![91.0, 76.0]);

    let req = test::TestRequest::get()
        .uri("/api/v1/matching-scores?contentId=c1&page=2&limit=2")
        .to_request();
    let body: MatchingScoreListResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.data.len(), 1);
    assert_eq!(body.data[0].reporter.id, "r1");
    assert_eq!(body.data[0].id, "r1-c1");
    assert_eq!(body.data[0].content.title, "AIとDXの新システム");
    assert_eq!(body.pagination.page, 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/matching-scores?limit=1000")
        .to_request();
    let body: MatchingScoreListResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.pagination.limit, 100);
    assert_eq!(body.pagination.total_pages, 1);
    assert_eq!(body.data.len(), 3);
}

#[actix_web::test]
async fn test_interview_request_uses_stored_score() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "c1" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "r3", "contentId": "c1", "tone": "URGENT" }))
        .to_request();
    let body: InterviewRequestResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.message.as_deref(), Some("インタビュー依頼を作成しました"));
    let request = body.data;
    assert_eq!(request.reporter_id, "r3");
    assert_eq!(request.status, "DRAFT");
    assert_eq!(request.tone, DraftTone::Urgent);
    assert_eq!(
        request.subject,
        "【インタビューご依頼】AIとDXの新システム - AI・DX Times様向けご提案"
    );
    assert!(request.body.contains("マッチング度: 91点"));
    assert_eq!(
        request.matching_reasons,
        vec![
            "AI技術への深い理解と取材実績",
            "DX・デジタル変革分野での豊富な執筆経験",
            "記事内容と専門分野の高い一致度",
            "AI・DX Timesの読者層との親和性",
        ]
    );
}

#[actix_web::test]
async fn test_interview_request_computes_missing_score() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store.clone(), fixed_processor(0.0)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "r2", "contentId": "c1" }))
        .to_request();
    let body: InterviewRequestResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.data.tone, DraftTone::Formal);
    assert!(body.data.body.contains("マッチング度: 75点"));

    let stored = store.get_matching_score("r2", "c1").await.unwrap().unwrap();
    assert_eq!(stored.score, 75.0);
}

#[actix_web::test]
async fn test_interview_request_not_found() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "nobody", "contentId": "c1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "記者が見つかりません");

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "r1", "contentId": "missing" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "コンテンツが見つかりません");

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "", "contentId": "c1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_list_interview_requests_filters() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    for reporter_id in ["r1", "r2", "r2"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/interview-requests")
            .set_json(json!({ "reporterId": reporter_id, "contentId": "c1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/interview-requests?contentId=c1")
        .to_request();
    let body: InterviewRequestListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/interview-requests?reporterId=r2&status=DRAFT")
        .to_request();
    let body: InterviewRequestListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 2);
    assert!(body.data.iter().all(|r| r.reporter_id == "r2"));

    let req = test::TestRequest::get()
        .uri("/api/v1/interview-requests?status=SENT")
        .to_request();
    let body: InterviewRequestListResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.count, 0);
    assert!(body.data.is_empty());
}

#[actix_web::test]
async fn test_interview_request_get_update_delete() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/interview-requests")
        .set_json(json!({ "reporterId": "r2", "contentId": "c1" }))
        .to_request();
    let created: InterviewRequestResponse = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/interview-requests/{}", created.data.id);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let fetched: InterviewRequestResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.data.id, created.data.id);
    assert_eq!(fetched.data.subject, created.data.subject);
    assert!(fetched.message.is_none());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "body": "修正した本文", "status": "SENT", "tone": "CASUAL" }))
        .to_request();
    let updated: InterviewRequestResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.message.as_deref(), Some("インタビュー依頼を更新しました"));
    assert_eq!(updated.data.body, "修正した本文");
    assert_eq!(updated.data.subject, created.data.subject);
    assert_eq!(updated.data.status, "SENT");
    assert_eq!(updated.data.tone, DraftTone::Casual);
    assert!(updated.data.sent_at.is_some());

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "subject": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let deleted: MessageResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deleted.message, "インタビュー依頼を削除しました");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "インタビュー依頼が見つかりません");

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_interview_request_unknown_ids() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/interview-requests/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/interview-requests/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "status": "SENT" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_top_matches() {
    let store = seeded_store().await;
    let app = test::init_service(
        App::new()
            .app_data(app_state(store, fixed_processor(0.1)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/ai/process-content")
        .set_json(json!({ "contentId": "c1" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matching-scores")
        .set_json(json!({ "contentId": "c1", "topN": 2 }))
        .to_request();
    let body: TopMatchesResponse = test::call_and_read_body_json(&app, req).await;

    assert!(body.success);
    assert_eq!(body.content_id, "c1");
    assert_eq!(body.message, "上位2記者のマッチング情報を取得しました");
    let ids: Vec<&str> = body.top_matches.iter().map(|m| m.reporter_id.as_str()).collect();
    assert_eq!(ids, vec!["r3", "r2"]);
    assert_eq!(body.top_matches[0].score, 91.0);
    assert_eq!(body.top_matches[0].reporter.company, "AI・DX Times");

    // topN defaults to 5
    let req = test::TestRequest::post()
        .uri("/api/v1/matching-scores")
        .set_json(json!({ "contentId": "c1" }))
        .to_request();
    let body: TopMatchesResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.top_matches.len(), 3);

    let req = test::TestRequest::post()
        .uri("/api/v1/matching-scores")
        .set_json(json!({ "topN": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
