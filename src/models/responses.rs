use serde::{Deserialize, Serialize};
use crate::models::domain::{InterviewRequest, MatchingScoreDetail, TopMatch};
use crate::core::ProcessingOutcome;

/// Counts echoed back by the process-content endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub content_id: String,
    pub content_title: String,
    pub tags_generated: usize,
    pub matching_scores: usize,
    pub recommendations: usize,
    pub high_score_reporters: usize,
}

/// Response for the process-content endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessContentResponse {
    pub success: bool,
    pub message: String,
    pub results: ProcessingSummary,
    pub data: ProcessingOutcome,
}

/// Response carrying one interview request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRequestResponse {
    pub data: InterviewRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Bare confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for listing interview requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewRequestListResponse {
    pub data: Vec<InterviewRequest>,
    pub count: usize,
}

/// Page position echoed with paginated lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    pub fn new(page: u32, limit: usize, total: usize) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Response for listing matching scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingScoreListResponse {
    pub success: bool,
    pub data: Vec<MatchingScoreDetail>,
    pub pagination: Pagination,
}

/// Response for the top matches of one content item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMatchesResponse {
    pub success: bool,
    pub content_id: String,
    pub top_matches: Vec<TopMatch>,
    pub message: String,
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
