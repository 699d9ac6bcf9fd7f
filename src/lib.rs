//! Press Match - tag suggestion and reporter matching for press relations
//!
//! This library provides the generation layer of the press relations platform.
//! It suggests tags for content, scores reporters against it, and drafts
//! recommendation and interview request messages for the best matches.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{ContentProcessor, Generated, GenerationError, JitterSource, ProcessingOutcome};
pub use self::models::{
    ContentProfile, DraftTone, InterviewRequestDraft, MatchingRules, MatchingScoreResult,
    RecommendationDraft, ReporterProfile, TagSuggestion,
};
