use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    drafts::{generate_interview_request, generate_recommendation},
    jitter::{JitterSource, ThreadJitter},
    outcome::Generated,
    scoring::calculate_matching_score,
    tagging::suggest_tags,
};
use crate::models::{
    ContentProfile, InterviewRequestDraft, MatchingRules, MatchingScoreResult, RecommendationDraft,
    ReporterProfile, ReporterRecommendation, TagSuggestion,
};

/// Failure that escapes the per-stage fallbacks
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Reporter not found in batch: {0}")]
    ReporterNotFound(String),
}

/// Everything produced for one content item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
    pub tags: Vec<TagSuggestion>,
    /// One result per input reporter, in input order
    pub matching_results: Vec<MatchingScoreResult>,
    /// Drafts for reporters at or above the recommendation threshold
    pub recommendations: Vec<ReporterRecommendation>,
}

/// Stateless content processor, constructed once at startup
///
/// # Pipeline Stages
/// 1. Tag suggestion for the content
/// 2. Matching score for every reporter
/// 3. Threshold filter on the scores
/// 4. Recommendation draft per remaining reporter
#[derive(Debug, Clone)]
pub struct ContentProcessor {
    rules: Arc<MatchingRules>,
    jitter: Arc<dyn JitterSource>,
    model_path: Option<PathBuf>,
}

impl ContentProcessor {
    pub fn new(rules: MatchingRules, jitter: Arc<dyn JitterSource>) -> Self {
        Self {
            rules: Arc::new(rules),
            jitter,
            model_path: None,
        }
    }

    pub fn with_default_rules() -> Self {
        Self::new(MatchingRules::default(), Arc::new(ThreadJitter))
    }

    /// Attach the path of the external model; it is recorded but not loaded
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    pub fn rules(&self) -> &MatchingRules {
        &self.rules
    }

    pub fn suggest_tags(&self, content: &ContentProfile) -> Generated<Vec<TagSuggestion>> {
        suggest_tags(content, &self.rules.tag_rules)
    }

    pub fn score(
        &self,
        reporter: &ReporterProfile,
        content: &ContentProfile,
    ) -> Generated<MatchingScoreResult> {
        calculate_matching_score(reporter, content, &self.rules.vocabulary, self.jitter.sample())
    }

    pub fn recommend(
        &self,
        reporter: &ReporterProfile,
        content: &ContentProfile,
        score: f64,
    ) -> Generated<RecommendationDraft> {
        generate_recommendation(reporter, content, score, self.rules.urgent_threshold)
    }

    pub fn interview_request(
        &self,
        reporter: &ReporterProfile,
        content: &ContentProfile,
        score: f64,
    ) -> Generated<InterviewRequestDraft> {
        generate_interview_request(
            reporter,
            content,
            score,
            self.rules.urgent_threshold,
            self.rules.interview_reason_threshold,
        )
    }

    /// Run the full pipeline for one content item against a reporter batch
    ///
    /// Stage fallbacks are absorbed into their default values. The only error
    /// returned is a recommendation whose reporter is missing from the batch.
    /// Every matching result, fallback included, carries the id of the reporter
    /// it was computed for, so that error marks a broken pairing and is not
    /// reachable from well-formed input.
    pub fn process(
        &self,
        content: &ContentProfile,
        reporters: &[ReporterProfile],
    ) -> Result<ProcessingOutcome, ProcessingError> {
        tracing::info!(
            "Processing content '{}' against {} reporters",
            content.title,
            reporters.len()
        );

        // Stage 1: Tags
        let tags = self.suggest_tags(content).into_value();

        // Stage 2: One score per reporter, no dedup
        let matching_results: Vec<MatchingScoreResult> = reporters
            .iter()
            .map(|reporter| self.score(reporter, content).into_value())
            .collect();

        // Stage 3 & 4: Recommendations for high scorers
        let recommendations = matching_results
            .iter()
            .filter(|result| result.score >= self.rules.recommendation_threshold)
            .map(|result| {
                let reporter = reporters
                    .iter()
                    .find(|r| r.id == result.reporter_id)
                    .ok_or_else(|| ProcessingError::ReporterNotFound(result.reporter_id.clone()))?;

                Ok(ReporterRecommendation {
                    reporter_id: result.reporter_id.clone(),
                    draft: self.recommend(reporter, content, result.score).into_value(),
                })
            })
            .collect::<Result<Vec<_>, ProcessingError>>()?;

        tracing::info!(
            "Processed '{}': {} tags, {} matching results, {} recommendations",
            content.title,
            tags.len(),
            matching_results.len(),
            recommendations.len()
        );

        Ok(ProcessingOutcome {
            tags,
            matching_results,
            recommendations,
        })
    }
}

impl Default for ContentProcessor {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
