use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Lifecycle status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "DRAFT",
            ContentStatus::Published => "PUBLISHED",
            ContentStatus::Archived => "ARCHIVED",
        }
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ContentStatus::Draft),
            "PUBLISHED" => Ok(ContentStatus::Published),
            "ARCHIVED" => Ok(ContentStatus::Archived),
            other => Err(format!("unknown content status: {}", other)),
        }
    }
}

/// Media contact as supplied by the persistence layer
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReporterProfile {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub email: String,
    /// Affiliated organization (free text, e.g. "日経新聞")
    #[validate(length(min = 1))]
    pub company: String,
    #[serde(default)]
    pub social_media: Option<BTreeMap<String, String>>,
}

impl ReporterProfile {
    /// Newspapers get the formal honorific and the "新聞" subject label
    pub fn is_newspaper(&self) -> bool {
        self.company.contains(NEWSPAPER_MARKER)
    }
}

pub const NEWSPAPER_MARKER: &str = "新聞";

/// Press-release-like content item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentProfile {
    #[validate(length(min = 1))]
    pub id: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub status: ContentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagCategory {
    Industry,
    Topic,
    Company,
    Technology,
    Event,
}

impl TagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Industry => "INDUSTRY",
            TagCategory::Topic => "TOPIC",
            TagCategory::Company => "COMPANY",
            TagCategory::Technology => "TECHNOLOGY",
            TagCategory::Event => "EVENT",
        }
    }
}

impl FromStr for TagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INDUSTRY" => Ok(TagCategory::Industry),
            "TOPIC" => Ok(TagCategory::Topic),
            "COMPANY" => Ok(TagCategory::Company),
            "TECHNOLOGY" => Ok(TagCategory::Technology),
            "EVENT" => Ok(TagCategory::Event),
            other => Err(format!("unknown tag category: {}", other)),
        }
    }
}

/// Suggested tag for a content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSuggestion {
    pub name: String,
    pub category: TagCategory,
    pub confidence: f64,
}

/// One row of the tag candidate table
///
/// A rule fires when any of its lowercase `triggers` is a substring of the
/// lowercased content text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRule {
    pub name: String,
    pub category: TagCategory,
    pub confidence: f64,
    pub triggers: Vec<String>,
}

impl TagRule {
    pub fn new(name: &str, category: TagCategory, confidence: f64, triggers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            category,
            confidence,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn suggestion(&self) -> TagSuggestion {
        TagSuggestion {
            name: self.name.clone(),
            category: self.category,
            confidence: self.confidence,
        }
    }
}

/// Reporter/content compatibility score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingScoreResult {
    pub reporter_id: String,
    pub content_id: String,
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DraftTone {
    Formal,
    Casual,
    Urgent,
}

impl DraftTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftTone::Formal => "FORMAL",
            DraftTone::Casual => "CASUAL",
            DraftTone::Urgent => "URGENT",
        }
    }
}

impl Default for DraftTone {
    fn default() -> Self {
        DraftTone::Formal
    }
}

impl fmt::Display for DraftTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftTone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FORMAL" => Ok(DraftTone::Formal),
            "CASUAL" => Ok(DraftTone::Casual),
            "URGENT" => Ok(DraftTone::Urgent),
            other => Err(format!("unknown draft tone: {}", other)),
        }
    }
}

/// Recommendation e-mail draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationDraft {
    pub subject: String,
    pub body: String,
    pub tone: DraftTone,
}

/// Interview request draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequestDraft {
    pub subject: String,
    pub body: String,
    pub matching_reasons: Vec<String>,
    pub tone: DraftTone,
}

/// Recommendation paired with the reporter it was written for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterRecommendation {
    pub reporter_id: String,
    pub draft: RecommendationDraft,
}

/// Data-driven rule set for tagging, scoring and draft generation
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingRules {
    pub vocabulary: Vec<String>,
    pub tag_rules: Vec<TagRule>,
    /// Minimum score for a reporter to receive a recommendation draft
    pub recommendation_threshold: f64,
    /// Scores strictly above this get the URGENT tone
    pub urgent_threshold: f64,
    /// Minimum score for the "high fit" interview reason
    pub interview_reason_threshold: f64,
}

impl Default for MatchingRules {
    fn default() -> Self {
        Self {
            vocabulary: default_vocabulary(),
            tag_rules: default_tag_rules(),
            recommendation_threshold: 75.0,
            urgent_threshold: 85.0,
            interview_reason_threshold: 80.0,
        }
    }
}

pub fn default_vocabulary() -> Vec<String> {
    [
        "AI", "DX", "IT", "クラウド", "セキュリティ", "IoT",
        "スタートアップ", "投資", "金融", "製造", "教育",
        "リクルート", "テクノロジー", "デジタル", "システム",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

pub fn default_tag_rules() -> Vec<TagRule> {
    vec![
        TagRule::new("AI・機械学習", TagCategory::Technology, 0.95, &["ai"]),
        TagRule::new("IT業界", TagCategory::Industry, 0.8, &["it", "システム"]),
        TagRule::new("DX・デジタル変革", TagCategory::Technology, 0.85, &["dx"]),
        TagRule::new("リクルート", TagCategory::Company, 0.9, &["リクルート"]),
    ]
}

/// Persisted interview request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRequest {
    pub id: uuid::Uuid,
    pub reporter_id: String,
    pub content_id: String,
    pub subject: String,
    pub body: String,
    pub matching_reasons: Vec<String>,
    pub tone: DraftTone,
    pub status: String,
    /// Set when the status moves to `SENT`
    #[serde(default)]
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

pub const INTERVIEW_STATUS_DRAFT: &str = "DRAFT";
pub const INTERVIEW_STATUS_SENT: &str = "SENT";

/// Interview request waiting to be stored
#[derive(Debug, Clone)]
pub struct NewInterviewRequest {
    pub reporter_id: String,
    pub content_id: String,
    pub draft: InterviewRequestDraft,
    pub tone: DraftTone,
}

/// Persisted matching score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMatchingScore {
    pub reporter_id: String,
    pub content_id: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StoredMatchingScore {
    pub fn into_result(self) -> MatchingScoreResult {
        MatchingScoreResult {
            reporter_id: self.reporter_id,
            content_id: self.content_id,
            score: self.score,
            reasons: self.reasons,
        }
    }
}

/// Content fields listed next to a matching score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub status: ContentStatus,
}

impl From<&ContentProfile> for ContentSummary {
    fn from(content: &ContentProfile) -> Self {
        Self {
            id: content.id.clone(),
            title: content.title.clone(),
            summary: content.summary.clone(),
            status: content.status,
        }
    }
}

/// Matching score joined with its reporter and content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingScoreDetail {
    /// `{reporterId}-{contentId}`
    pub id: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub reporter: ReporterProfile,
    pub content: ContentSummary,
}

impl MatchingScoreDetail {
    pub fn pair_id(reporter_id: &str, content_id: &str) -> String {
        format!("{}-{}", reporter_id, content_id)
    }
}

/// Best-scoring reporter for a content item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMatch {
    pub reporter_id: String,
    pub reporter: ReporterProfile,
    pub score: f64,
    pub reasons: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
