use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use uuid::Uuid;

use crate::models::domain::{INTERVIEW_STATUS_DRAFT, INTERVIEW_STATUS_SENT};
use crate::models::{
    ContentProfile, ContentSummary, InterviewRequest, InterviewRequestFilter, MatchingScoreDetail,
    MatchingScoreQuery, MatchingScoreResult, NewInterviewRequest, ReporterProfile,
    ReporterRecommendation, StoredMatchingScore, TagCategory, TagSuggestion, TopMatch,
    UpdateInterviewRequest,
};
use crate::services::store::{Store, StoreError};

fn by_score_desc(a: &StoredMatchingScore, b: &StoredMatchingScore) -> std::cmp::Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(std::cmp::Ordering::Equal)
}

#[derive(Debug, Default)]
struct MemoryState {
    reporters: Vec<ReporterProfile>,
    contents: BTreeMap<String, ContentProfile>,
    tags: BTreeMap<String, (TagCategory, f64)>,
    content_tags: BTreeMap<(String, String), f64>,
    matching_scores: BTreeMap<(String, String), StoredMatchingScore>,
    recommendations: Vec<(String, ReporterRecommendation)>,
    interview_requests: Vec<InterviewRequest>,
}

impl MemoryState {
    fn reporter(&self, id: &str) -> Option<&ReporterProfile> {
        self.reporters.iter().find(|r| r.id == id)
    }
}

/// In-process store with the same semantics as the PostgreSQL one
///
/// Used by the test suites and benchmarks; reporters are listed in insertion
/// order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `health_check` fail until availability is restored
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::Relaxed);
    }

    /// Insert or replace a reporter
    pub async fn insert_reporter(&self, reporter: ReporterProfile) {
        let mut state = self.state.write().await;
        match state.reporters.iter_mut().find(|r| r.id == reporter.id) {
            Some(existing) => *existing = reporter,
            None => state.reporters.push(reporter),
        }
    }

    /// Insert or replace a content item
    pub async fn insert_content(&self, content: ContentProfile) {
        let mut state = self.state.write().await;
        state.contents.insert(content.id.clone(), content);
    }

    /// Tag names linked to a content item with their confidence
    pub async fn content_tags(&self, content_id: &str) -> Vec<(String, f64)> {
        let state = self.state.read().await;
        state
            .content_tags
            .iter()
            .filter(|((cid, _), _)| cid == content_id)
            .map(|((_, name), confidence)| (name.clone(), *confidence))
            .collect()
    }

    /// Stored recommendation drafts for a content item
    pub async fn recommendations(&self, content_id: &str) -> Vec<ReporterRecommendation> {
        let state = self.state.read().await;
        state
            .recommendations
            .iter()
            .filter(|(cid, _)| cid == content_id)
            .map(|(_, rec)| rec.clone())
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_content(&self, id: &str) -> Result<Option<ContentProfile>, StoreError> {
        Ok(self.state.read().await.contents.get(id).cloned())
    }

    async fn get_reporter(&self, id: &str) -> Result<Option<ReporterProfile>, StoreError> {
        Ok(self.state.read().await.reporter(id).cloned())
    }

    async fn list_reporters(&self) -> Result<Vec<ReporterProfile>, StoreError> {
        Ok(self.state.read().await.reporters.clone())
    }

    async fn save_tags(&self, content_id: &str, tags: &[TagSuggestion]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        for tag in tags {
            state
                .tags
                .entry(tag.name.clone())
                .or_insert((tag.category, tag.confidence));
            state
                .content_tags
                .insert((content_id.to_string(), tag.name.clone()), tag.confidence);
        }
        Ok(())
    }

    async fn save_matching_scores(&self, results: &[MatchingScoreResult]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        for result in results {
            let key = (result.reporter_id.clone(), result.content_id.clone());
            let created_at = state
                .matching_scores
                .get(&key)
                .map(|existing| existing.created_at)
                .unwrap_or(now);
            state.matching_scores.insert(
                key,
                StoredMatchingScore {
                    reporter_id: result.reporter_id.clone(),
                    content_id: result.content_id.clone(),
                    score: result.score,
                    reasons: result.reasons.clone(),
                    created_at,
                    updated_at: now,
                },
            );
        }
        Ok(())
    }

    async fn get_matching_score(
        &self,
        reporter_id: &str,
        content_id: &str,
    ) -> Result<Option<StoredMatchingScore>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .matching_scores
            .get(&(reporter_id.to_string(), content_id.to_string()))
            .cloned())
    }

    async fn list_matching_scores(
        &self,
        query: &MatchingScoreQuery,
    ) -> Result<(Vec<MatchingScoreDetail>, usize), StoreError> {
        let state = self.state.read().await;
        // Inner join: scores whose reporter or content is gone are skipped
        let mut matching: Vec<(&StoredMatchingScore, &ReporterProfile, &ContentProfile)> = state
            .matching_scores
            .values()
            .filter(|s| query.content_id.as_ref().map_or(true, |id| &s.content_id == id))
            .filter(|s| query.reporter_id.as_ref().map_or(true, |id| &s.reporter_id == id))
            .filter_map(|s| {
                let reporter = state.reporter(&s.reporter_id)?;
                let content = state.contents.get(&s.content_id)?;
                Some((s, reporter, content))
            })
            .collect();

        matching.sort_by(|a, b| by_score_desc(a.0, b.0));

        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(query.offset())
            .take(query.capped_limit())
            .map(|(score, reporter, content)| MatchingScoreDetail {
                id: MatchingScoreDetail::pair_id(&score.reporter_id, &score.content_id),
                score: score.score,
                reasons: score.reasons.clone(),
                created_at: score.created_at,
                reporter: reporter.clone(),
                content: ContentSummary::from(content),
            })
            .collect();

        Ok((page, total))
    }

    async fn top_matches(&self, content_id: &str, limit: usize) -> Result<Vec<TopMatch>, StoreError> {
        let state = self.state.read().await;
        let mut scores: Vec<&StoredMatchingScore> = state
            .matching_scores
            .values()
            .filter(|s| s.content_id == content_id)
            .collect();

        scores.sort_by(|a, b| by_score_desc(a, b));

        Ok(scores
            .into_iter()
            .filter_map(|s| {
                let reporter = state.reporter(&s.reporter_id)?;
                Some(TopMatch {
                    reporter_id: s.reporter_id.clone(),
                    reporter: reporter.clone(),
                    score: s.score,
                    reasons: s.reasons.clone(),
                    created_at: s.created_at,
                })
            })
            .take(limit)
            .collect())
    }

    async fn save_recommendations(
        &self,
        content_id: &str,
        recommendations: &[ReporterRecommendation],
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.recommendations.extend(
            recommendations
                .iter()
                .map(|rec| (content_id.to_string(), rec.clone())),
        );
        Ok(())
    }

    async fn create_interview_request(
        &self,
        request: NewInterviewRequest,
    ) -> Result<InterviewRequest, StoreError> {
        let now = Utc::now();
        let stored = InterviewRequest {
            id: uuid::Uuid::new_v4(),
            reporter_id: request.reporter_id,
            content_id: request.content_id,
            subject: request.draft.subject,
            body: request.draft.body,
            matching_reasons: request.draft.matching_reasons,
            tone: request.tone,
            status: INTERVIEW_STATUS_DRAFT.to_string(),
            sent_at: None,
            created_at: now,
            updated_at: now,
        };

        self.state.write().await.interview_requests.push(stored.clone());
        Ok(stored)
    }

    async fn list_interview_requests(
        &self,
        filter: &InterviewRequestFilter,
    ) -> Result<Vec<InterviewRequest>, StoreError> {
        let state = self.state.read().await;
        // Pushed in creation order, so reversing gives newest first
        Ok(state
            .interview_requests
            .iter()
            .rev()
            .filter(|r| filter.content_id.as_ref().map_or(true, |id| &r.content_id == id))
            .filter(|r| filter.reporter_id.as_ref().map_or(true, |id| &r.reporter_id == id))
            .filter(|r| filter.status.as_ref().map_or(true, |s| &r.status == s))
            .cloned()
            .collect())
    }

    async fn get_interview_request(&self, id: Uuid) -> Result<Option<InterviewRequest>, StoreError> {
        let state = self.state.read().await;
        Ok(state.interview_requests.iter().find(|r| r.id == id).cloned())
    }

    async fn update_interview_request(
        &self,
        id: Uuid,
        update: &UpdateInterviewRequest,
    ) -> Result<Option<InterviewRequest>, StoreError> {
        let mut state = self.state.write().await;
        let Some(request) = state.interview_requests.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        let now = Utc::now();
        if let Some(subject) = &update.subject {
            request.subject = subject.clone();
        }
        if let Some(body) = &update.body {
            request.body = body.clone();
        }
        if let Some(status) = &update.status {
            request.status = status.clone();
            if status == INTERVIEW_STATUS_SENT {
                request.sent_at = Some(now);
            }
        }
        if let Some(tone) = update.tone {
            request.tone = tone;
        }
        request.updated_at = now;

        Ok(Some(request.clone()))
    }

    async fn delete_interview_request(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let before = state.interview_requests.len();
        state.interview_requests.retain(|r| r.id != id);
        Ok(state.interview_requests.len() != before)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable);
        }
        Ok(true)
    }
}
