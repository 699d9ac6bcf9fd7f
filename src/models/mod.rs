// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ContentProfile, ContentStatus, ContentSummary, DraftTone, InterviewRequest,
    InterviewRequestDraft, MatchingRules, MatchingScoreDetail, MatchingScoreResult,
    NewInterviewRequest, RecommendationDraft, ReporterProfile, ReporterRecommendation,
    StoredMatchingScore, TagCategory, TagRule, TagSuggestion, TopMatch,
};
pub use requests::{
    CreateInterviewRequest, InterviewRequestFilter, MatchingScoreQuery, ProcessContentRequest,
    TopMatchesRequest, UpdateInterviewRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, InterviewRequestListResponse, InterviewRequestResponse,
    MatchingScoreListResponse, MessageResponse, Pagination, ProcessContentResponse,
    ProcessingSummary, TopMatchesResponse,
};
