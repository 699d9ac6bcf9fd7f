use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::DraftTone;

/// Request to run the full AI pipeline for one content item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessContentRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "content_id", rename = "contentId", default)]
    pub content_id: String,
}

/// Request to draft an interview request for a reporter
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInterviewRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "reporter_id", rename = "reporterId")]
    pub reporter_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "content_id", rename = "contentId")]
    pub content_id: String,
    #[serde(default)]
    pub tone: DraftTone,
}

/// Partial update of a stored interview request; absent fields are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateInterviewRequest {
    #[validate(length(min = 1))]
    pub subject: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    #[validate(length(min = 1))]
    pub status: Option<String>,
    pub tone: Option<DraftTone>,
}

/// Request for the best-scoring reporters of one content item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TopMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "content_id", rename = "contentId", default)]
    pub content_id: String,
    #[validate(range(min = 1, max = 100))]
    #[serde(alias = "top_n", rename = "topN", default = "default_top_n")]
    pub top_n: u32,
}

fn default_top_n() -> u32 {
    5
}

/// Filter for listing interview requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewRequestFilter {
    #[serde(rename = "contentId")]
    pub content_id: Option<String>,
    #[serde(rename = "reporterId")]
    pub reporter_id: Option<String>,
    pub status: Option<String>,
}

/// Filter and pagination for listing matching scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingScoreQuery {
    #[serde(rename = "contentId")]
    pub content_id: Option<String>,
    #[serde(rename = "reporterId")]
    pub reporter_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for MatchingScoreQuery {
    fn default() -> Self {
        Self {
            content_id: None,
            reporter_id: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl MatchingScoreQuery {
    /// Zero-based row offset for the requested page
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.capped_limit()
    }

    /// Cap limit at 100 to prevent excessive queries
    pub fn capped_limit(&self) -> usize {
        self.limit.clamp(1, 100) as usize
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}
