use crate::core::keywords::{extract_keywords, overlapping_keywords};
use crate::core::outcome::{check_content, check_reporter, Generated};
use crate::models::{ContentProfile, MatchingScoreResult, ReporterProfile};

/// Score with zero keyword overlap
pub const BASE_SCORE: f64 = 60.0;
/// Points per overlapping keyword
pub const OVERLAP_POINTS: f64 = 15.0;
/// Ceiling applied before jitter, so final scores can reach just under 100
pub const BASE_SCORE_CAP: f64 = 90.0;
/// Width of the jitter interval added to the base score
pub const JITTER_SPAN: f64 = 10.0;

const MAX_KEYWORD_REASONS: usize = 3;
const FILLER_REASONS: [&str; 2] = ["記者の専門性", "関連性の高さ"];
const FAILURE_REASON: &str = "計算エラー";

/// Calculate a matching score for a reporter/content pair
///
/// Scoring formula:
/// score = round1(min(90, overlap * 15 + 60) + jitter * 10)
///
/// Reporter keywords come from the company name, content keywords from
/// `title summary`. `jitter` is a sample in `[0, 1)`. Invalid input falls back
/// to a zero score with a single failure reason.
pub fn calculate_matching_score(
    reporter: &ReporterProfile,
    content: &ContentProfile,
    vocabulary: &[String],
    jitter: f64,
) -> Generated<MatchingScoreResult> {
    tracing::debug!("Scoring {} x {}", reporter.name, content.title);

    let result = check_reporter(reporter)
        .and_then(|_| check_content(content))
        .map(|_| {
            let reporter_keywords = extract_keywords(&reporter.company, vocabulary);
            let content_text = format!("{} {}", content.title, content.summary);
            let content_keywords = extract_keywords(&content_text, vocabulary);
            let common = overlapping_keywords(&reporter_keywords, &content_keywords);

            let score = round_one_decimal(base_score(common.len()) + jitter * JITTER_SPAN);

            let reasons = common
                .iter()
                .take(MAX_KEYWORD_REASONS)
                .map(|k| k.to_string())
                .chain(FILLER_REASONS.iter().map(|r| r.to_string()))
                .collect();

            MatchingScoreResult {
                reporter_id: reporter.id.clone(),
                content_id: content.id.clone(),
                score,
                reasons,
            }
        });

    let generated = Generated::or_fallback(result, || MatchingScoreResult {
        reporter_id: reporter.id.clone(),
        content_id: content.id.clone(),
        score: 0.0,
        reasons: vec![FAILURE_REASON.to_string()],
    });

    match &generated {
        Generated::Fresh(result) => tracing::debug!("Matching score: {:.1}", result.score),
        Generated::Fallback { cause, .. } => tracing::warn!("Matching score failed: {}", cause),
    }

    generated
}

/// Score before jitter, in `[60, 90]`
#[inline]
pub fn base_score(overlap_count: usize) -> f64 {
    (overlap_count as f64 * OVERLAP_POINTS + BASE_SCORE).min(BASE_SCORE_CAP)
}

#[inline]
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
