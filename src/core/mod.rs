// Core generation exports
pub mod drafts;
pub mod jitter;
pub mod keywords;
pub mod outcome;
pub mod processor;
pub mod scoring;
pub mod tagging;

pub use drafts::{generate_interview_request, generate_recommendation, select_tone};
pub use jitter::{FixedJitter, JitterSource, SeededJitter, ThreadJitter};
pub use keywords::{extract_keywords, overlapping_keywords};
pub use outcome::{GenerationError, Generated};
pub use processor::{ContentProcessor, ProcessingError, ProcessingOutcome};
pub use scoring::{base_score, calculate_matching_score};
pub use tagging::suggest_tags;
