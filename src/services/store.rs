use async_trait::async_trait;
use thiserror::Error;

use uuid::Uuid;

use crate::models::{
    ContentProfile, InterviewRequest, InterviewRequestFilter, MatchingScoreDetail,
    MatchingScoreQuery, MatchingScoreResult, NewInterviewRequest, ReporterProfile,
    ReporterRecommendation, StoredMatchingScore, TagSuggestion, TopMatch, UpdateInterviewRequest,
};

/// Errors that can occur when reading or writing records
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Store unavailable")]
    Unavailable,
}

/// Persistence boundary for profiles and generated artefacts
///
/// Matching scores are keyed by (reporter, content); tags are unique by name
/// and linked to content by (content, tag).
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_content(&self, id: &str) -> Result<Option<ContentProfile>, StoreError>;

    async fn get_reporter(&self, id: &str) -> Result<Option<ReporterProfile>, StoreError>;

    async fn list_reporters(&self) -> Result<Vec<ReporterProfile>, StoreError>;

    /// Create missing tags and upsert the content links with their confidence
    async fn save_tags(&self, content_id: &str, tags: &[TagSuggestion]) -> Result<(), StoreError>;

    /// Upsert scores, replacing score and reasons for existing pairs
    async fn save_matching_scores(&self, results: &[MatchingScoreResult]) -> Result<(), StoreError>;

    async fn get_matching_score(
        &self,
        reporter_id: &str,
        content_id: &str,
    ) -> Result<Option<StoredMatchingScore>, StoreError>;

    /// One page of scores ordered by score descending, plus the total count
    ///
    /// Each row carries its reporter and content.
    async fn list_matching_scores(
        &self,
        query: &MatchingScoreQuery,
    ) -> Result<(Vec<MatchingScoreDetail>, usize), StoreError>;

    /// The `limit` best scores for a content item with their reporters
    async fn top_matches(&self, content_id: &str, limit: usize) -> Result<Vec<TopMatch>, StoreError>;

    async fn save_recommendations(
        &self,
        content_id: &str,
        recommendations: &[ReporterRecommendation],
    ) -> Result<(), StoreError>;

    async fn create_interview_request(
        &self,
        request: NewInterviewRequest,
    ) -> Result<InterviewRequest, StoreError>;

    /// Newest first
    async fn list_interview_requests(
        &self,
        filter: &InterviewRequestFilter,
    ) -> Result<Vec<InterviewRequest>, StoreError>;

    async fn get_interview_request(&self, id: Uuid) -> Result<Option<InterviewRequest>, StoreError>;

    /// Apply the fields present in `update`; `None` for an unknown id
    ///
    /// Moving to `SENT` stamps `sent_at`.
    async fn update_interview_request(
        &self,
        id: Uuid,
        update: &UpdateInterviewRequest,
    ) -> Result<Option<InterviewRequest>, StoreError>;

    /// `false` when no request had this id
    async fn delete_interview_request(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
