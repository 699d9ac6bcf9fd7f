use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

use crate::models::domain::INTERVIEW_STATUS_DRAFT;
use crate::models::{
    ContentProfile, ContentStatus, ContentSummary, DraftTone, InterviewRequest,
    InterviewRequestFilter, MatchingScoreDetail, MatchingScoreQuery, MatchingScoreResult,
    NewInterviewRequest, ReporterProfile, ReporterRecommendation, StoredMatchingScore,
    TagSuggestion, TopMatch, UpdateInterviewRequest,
};
use crate::services::store::{Store, StoreError};

/// PostgreSQL-backed store
///
/// Reporter and content rows are owned by the CRUD side of the application;
/// this client reads them and writes the generated tags, scores and drafts.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

const INTERVIEW_COLUMNS: &str = "id, reporter_id, content_id, subject, body, matching_reasons, \
    tone, status, sent_at, created_at, updated_at";

/// Social media handles from the free-form JSONB column
///
/// Scalars are kept as strings. Nested values, non-object documents and
/// undecodable columns are dropped with a warning so one odd row cannot fail
/// a whole reporter listing.
fn social_media_from_row(
    row: &PgRow,
    column: &str,
    reporter_id: &str,
) -> Option<BTreeMap<String, String>> {
    match row.try_get::<Option<Json<Value>>, _>(column) {
        Ok(value) => social_media_from_json(reporter_id, value?.0),
        Err(e) => {
            tracing::warn!("Ignoring undecodable social_media for reporter {}: {}", reporter_id, e);
            None
        }
    }
}

fn social_media_from_json(reporter_id: &str, value: Value) -> Option<BTreeMap<String, String>> {
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Null => return None,
        other => {
            tracing::warn!("Ignoring non-object social_media for reporter {}: {}", reporter_id, other);
            return None;
        }
    };

    let mut handles = BTreeMap::new();
    for (key, value) in entries {
        match value {
            Value::String(handle) => {
                handles.insert(key, handle);
            }
            Value::Number(n) => {
                handles.insert(key, n.to_string());
            }
            Value::Bool(b) => {
                handles.insert(key, b.to_string());
            }
            Value::Null => {}
            nested => {
                tracing::warn!("Dropping social_media.{} for reporter {}: {}", key, reporter_id, nested);
            }
        }
    }

    Some(handles)
}

fn reporter_from_row(row: &PgRow) -> Result<ReporterProfile, StoreError> {
    let id: String = row.try_get("id")?;
    let social_media = social_media_from_row(row, "social_media", &id);

    Ok(ReporterProfile {
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        company: row.try_get("company")?,
        social_media,
        id,
    })
}

/// Reporter columns selected under a `reporter_` prefix in joins
fn joined_reporter_from_row(row: &PgRow) -> Result<ReporterProfile, StoreError> {
    let id: String = row.try_get("reporter_id")?;
    let social_media = social_media_from_row(row, "reporter_social_media", &id);

    Ok(ReporterProfile {
        name: row.try_get("reporter_name")?,
        email: row.try_get("reporter_email")?,
        company: row.try_get("reporter_company")?,
        social_media,
        id,
    })
}

fn content_from_row(row: &PgRow) -> Result<ContentProfile, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(ContentProfile {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        summary: row.try_get("summary")?,
        body: row.try_get("body")?,
        status: status.parse::<ContentStatus>().map_err(StoreError::Decode)?,
    })
}

fn score_from_row(row: &PgRow) -> Result<StoredMatchingScore, StoreError> {
    let reasons: Json<Vec<String>> = row.try_get("reasons")?;

    Ok(StoredMatchingScore {
        reporter_id: row.try_get("reporter_id")?,
        content_id: row.try_get("content_id")?,
        score: row.try_get("score")?,
        reasons: reasons.0,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn interview_from_row(row: &PgRow) -> Result<InterviewRequest, StoreError> {
    let reasons: Json<Vec<String>> = row.try_get("matching_reasons")?;
    let tone: String = row.try_get("tone")?;

    Ok(InterviewRequest {
        id: row.try_get("id")?,
        reporter_id: row.try_get("reporter_id")?,
        content_id: row.try_get("content_id")?,
        subject: row.try_get("subject")?,
        body: row.try_get("body")?,
        matching_reasons: reasons.0,
        tone: tone.parse::<DraftTone>().map_err(StoreError::Decode)?,
        status: row.try_get("status")?,
        sent_at: row.try_get("sent_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn score_detail_from_row(row: &PgRow) -> Result<MatchingScoreDetail, StoreError> {
    let reasons: Json<Vec<String>> = row.try_get("reasons")?;
    let reporter = joined_reporter_from_row(row)?;
    let content_id: String = row.try_get("content_id")?;
    let status: String = row.try_get("content_status")?;

    Ok(MatchingScoreDetail {
        id: MatchingScoreDetail::pair_id(&reporter.id, &content_id),
        score: row.try_get("score")?,
        reasons: reasons.0,
        created_at: row.try_get("created_at")?,
        content: ContentSummary {
            title: row.try_get("content_title")?,
            summary: row.try_get("content_summary")?,
            status: status.parse::<ContentStatus>().map_err(StoreError::Decode)?,
            id: content_id,
        },
        reporter,
    })
}

fn top_match_from_row(row: &PgRow) -> Result<TopMatch, StoreError> {
    let reasons: Json<Vec<String>> = row.try_get("reasons")?;
    let reporter = joined_reporter_from_row(row)?;

    Ok(TopMatch {
        reporter_id: reporter.id.clone(),
        reporter,
        score: row.try_get("score")?,
        reasons: reasons.0,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Store for PostgresClient {
    async fn get_content(&self, id: &str) -> Result<Option<ContentProfile>, StoreError> {
        let query = r#"
            SELECT id, title, summary, body, status
            FROM contents
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(content_from_row).transpose()
    }

    async fn get_reporter(&self, id: &str) -> Result<Option<ReporterProfile>, StoreError> {
        let query = r#"
            SELECT id, name, email, company, social_media
            FROM reporters
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(reporter_from_row).transpose()
    }

    async fn list_reporters(&self) -> Result<Vec<ReporterProfile>, StoreError> {
        let query = r#"
            SELECT id, name, email, company, social_media
            FROM reporters
            ORDER BY created_at ASC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        rows.iter().map(reporter_from_row).collect()
    }

    async fn save_tags(&self, content_id: &str, tags: &[TagSuggestion]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for tag in tags {
            // Existing tags keep their category and weight
            sqlx::query(
                r#"
                INSERT INTO tags (id, name, category, weight)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (name) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&tag.name)
            .bind(tag.category.as_str())
            .bind(tag.confidence)
            .execute(&mut *tx)
            .await?;

            let tag_id: Uuid = sqlx::query("SELECT id FROM tags WHERE name = $1")
                .bind(&tag.name)
                .fetch_one(&mut *tx)
                .await?
                .try_get("id")?;

            sqlx::query(
                r#"
                INSERT INTO content_tags (content_id, tag_id, confidence)
                VALUES ($1, $2, $3)
                ON CONFLICT (content_id, tag_id)
                DO UPDATE SET confidence = EXCLUDED.confidence
                "#,
            )
            .bind(content_id)
            .bind(tag_id)
            .bind(tag.confidence)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!("Saved {} tags for content {}", tags.len(), content_id);

        Ok(())
    }

    async fn save_matching_scores(&self, results: &[MatchingScoreResult]) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO matching_scores (reporter_id, content_id, score, reasons, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            ON CONFLICT (reporter_id, content_id)
            DO UPDATE SET
                score = EXCLUDED.score,
                reasons = EXCLUDED.reasons,
                updated_at = EXCLUDED.updated_at
        "#;

        let mut tx = self.pool.begin().await?;

        for result in results {
            sqlx::query(query)
                .bind(&result.reporter_id)
                .bind(&result.content_id)
                .bind(result.score)
                .bind(Json(&result.reasons))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Saved {} matching scores", results.len());

        Ok(())
    }

    async fn get_matching_score(
        &self,
        reporter_id: &str,
        content_id: &str,
    ) -> Result<Option<StoredMatchingScore>, StoreError> {
        let query = r#"
            SELECT reporter_id, content_id, score, reasons, created_at, updated_at
            FROM matching_scores
            WHERE reporter_id = $1 AND content_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(reporter_id)
            .bind(content_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(score_from_row).transpose()
    }

    async fn list_matching_scores(
        &self,
        query: &MatchingScoreQuery,
    ) -> Result<(Vec<MatchingScoreDetail>, usize), StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT ms.reporter_id, ms.content_id, ms.score, ms.reasons, ms.created_at,
                   r.name AS reporter_name, r.email AS reporter_email,
                   r.company AS reporter_company, r.social_media AS reporter_social_media,
                   c.title AS content_title, c.summary AS content_summary,
                   c.status AS content_status
            FROM matching_scores ms
            JOIN reporters r ON r.id = ms.reporter_id
            JOIN contents c ON c.id = ms.content_id
            WHERE ($1::text IS NULL OR ms.content_id = $1)
              AND ($2::text IS NULL OR ms.reporter_id = $2)
            ORDER BY ms.score DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.content_id.as_deref())
        .bind(query.reporter_id.as_deref())
        .bind(query.capped_limit() as i64)
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM matching_scores
            WHERE ($1::text IS NULL OR content_id = $1)
              AND ($2::text IS NULL OR reporter_id = $2)
            "#,
        )
        .bind(query.content_id.as_deref())
        .bind(query.reporter_id.as_deref())
        .fetch_one(&self.pool)
        .await?
        .try_get("total")?;

        let scores = rows.iter().map(score_detail_from_row).collect::<Result<Vec<_>, _>>()?;

        Ok((scores, total.max(0) as usize))
    }

    async fn top_matches(&self, content_id: &str, limit: usize) -> Result<Vec<TopMatch>, StoreError> {
        let query = r#"
            SELECT ms.reporter_id, ms.score, ms.reasons, ms.created_at,
                   r.name AS reporter_name, r.email AS reporter_email,
                   r.company AS reporter_company, r.social_media AS reporter_social_media
            FROM matching_scores ms
            JOIN reporters r ON r.id = ms.reporter_id
            WHERE ms.content_id = $1
            ORDER BY ms.score DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(content_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(top_match_from_row).collect()
    }

    async fn save_recommendations(
        &self,
        content_id: &str,
        recommendations: &[ReporterRecommendation],
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO recommendation_drafts (id, reporter_id, content_id, subject, body, tone, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#;

        let mut tx = self.pool.begin().await?;

        for recommendation in recommendations {
            sqlx::query(query)
                .bind(Uuid::new_v4())
                .bind(&recommendation.reporter_id)
                .bind(content_id)
                .bind(&recommendation.draft.subject)
                .bind(&recommendation.draft.body)
                .bind(recommendation.draft.tone.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn create_interview_request(
        &self,
        request: NewInterviewRequest,
    ) -> Result<InterviewRequest, StoreError> {
        let query = format!(
            r#"
            INSERT INTO interview_requests
                (id, reporter_id, content_id, subject, body, matching_reasons, tone, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&request.reporter_id)
            .bind(&request.content_id)
            .bind(&request.draft.subject)
            .bind(&request.draft.body)
            .bind(Json(&request.draft.matching_reasons))
            .bind(request.tone.as_str())
            .bind(INTERVIEW_STATUS_DRAFT)
            .fetch_one(&self.pool)
            .await?;

        interview_from_row(&row)
    }

    async fn list_interview_requests(
        &self,
        filter: &InterviewRequestFilter,
    ) -> Result<Vec<InterviewRequest>, StoreError> {
        let query = format!(
            r#"
            SELECT {}
            FROM interview_requests
            WHERE ($1::text IS NULL OR content_id = $1)
              AND ($2::text IS NULL OR reporter_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
            INTERVIEW_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(filter.content_id.as_deref())
            .bind(filter.reporter_id.as_deref())
            .bind(filter.status.as_deref())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(interview_from_row).collect()
    }

    async fn get_interview_request(&self, id: Uuid) -> Result<Option<InterviewRequest>, StoreError> {
        let query = format!("SELECT {} FROM interview_requests WHERE id = $1", INTERVIEW_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(interview_from_row).transpose()
    }

    async fn update_interview_request(
        &self,
        id: Uuid,
        update: &UpdateInterviewRequest,
    ) -> Result<Option<InterviewRequest>, StoreError> {
        let query = format!(
            r#"
            UPDATE interview_requests SET
                subject = COALESCE($2::text, subject),
                body = COALESCE($3::text, body),
                status = COALESCE($4::text, status),
                tone = COALESCE($5::text, tone),
                sent_at = CASE WHEN $4::text = 'SENT' THEN NOW() ELSE sent_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INTERVIEW_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .bind(update.subject.as_deref())
            .bind(update.body.as_deref())
            .bind(update.status.as_deref())
            .bind(update.tone.map(|tone| tone.as_str()))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(interview_from_row).transpose()
    }

    async fn delete_interview_request(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM interview_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_social_media_keeps_strings() {
        let handles = social_media_from_json(
            "r1",
            json!({ "twitter": "@tanaka", "note": "tanaka_note" }),
        )
        .unwrap();

        assert_eq!(handles.get("twitter").map(String::as_str), Some("@tanaka"));
        assert_eq!(handles.len(), 2);
    }

    #[test]
    fn test_social_media_tolerates_mixed_values() {
        let handles = social_media_from_json(
            "r1",
            json!({
                "twitter": "@tanaka",
                "followers": 1200,
                "verified": true,
                "profile": { "bio": "記者" },
                "linkedin": null
            }),
        )
        .unwrap();

        assert_eq!(handles.get("twitter").map(String::as_str), Some("@tanaka"));
        assert_eq!(handles.get("followers").map(String::as_str), Some("1200"));
        assert_eq!(handles.get("verified").map(String::as_str), Some("true"));
        assert!(!handles.contains_key("profile"));
        assert!(!handles.contains_key("linkedin"));
    }

    #[test]
    fn test_social_media_non_object_is_dropped() {
        assert!(social_media_from_json("r1", json!(["@tanaka"])).is_none());
        assert!(social_media_from_json("r1", json!("@tanaka")).is_none());
        assert!(social_media_from_json("r1", Value::Null).is_none());
    }
}
