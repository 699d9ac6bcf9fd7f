//! Template-based outreach drafts.
//!
//! Recommendation e-mails go out automatically for high-scoring reporters;
//! interview requests are drafted on demand. Both pick the tone from the
//! score alone and never produce `CASUAL`.

use crate::core::outcome::{check_reporter, Generated};
use crate::models::{
    ContentProfile, DraftTone, InterviewRequestDraft, RecommendationDraft, ReporterProfile,
};

const URGENT_PREFIX: &str = "【緊急】";
const PROPOSAL_PREFIX: &str = "【取材ご提案】";
const INTERVIEW_PREFIX: &str = "【インタビューご依頼】";
const PRIORITY_PHRASE: &str = "ぜひ優先的に";

const MAX_INTERVIEW_REASONS: usize = 4;

/// Tone for a draft: URGENT strictly above the threshold, FORMAL otherwise
#[inline]
pub fn select_tone(score: f64, urgent_threshold: f64) -> DraftTone {
    if score > urgent_threshold {
        DraftTone::Urgent
    } else {
        DraftTone::Formal
    }
}

fn honorific(reporter: &ReporterProfile) -> &'static str {
    if reporter.is_newspaper() {
        "様"
    } else {
        "さん"
    }
}

fn organization_label(reporter: &ReporterProfile) -> &'static str {
    if reporter.is_newspaper() {
        "新聞"
    } else {
        "メディア"
    }
}

/// Draft a recommendation e-mail for one reporter
pub fn generate_recommendation(
    reporter: &ReporterProfile,
    content: &ContentProfile,
    score: f64,
    urgent_threshold: f64,
) -> Generated<RecommendationDraft> {
    tracing::debug!("Generating recommendation for {}", reporter.name);

    let result = check_reporter(reporter).map(|_| {
        let urgent = score > urgent_threshold;
        let prefix = if urgent { URGENT_PREFIX } else { PROPOSAL_PREFIX };
        let subject = format!(
            "{}{}様向け - {}について",
            prefix,
            organization_label(reporter),
            content.title
        );

        RecommendationDraft {
            subject,
            body: recommendation_body(reporter, content, score, urgent),
            tone: select_tone(score, urgent_threshold),
        }
    });

    let generated = Generated::or_fallback(result, || RecommendationDraft {
        subject: format!("{}{}", PROPOSAL_PREFIX, content.title),
        body: "レコメンド文章の生成に失敗しました。".to_string(),
        tone: DraftTone::Formal,
    });

    if let Some(cause) = generated.cause() {
        tracing::warn!("Recommendation generation failed: {}", cause);
    }

    generated
}

fn recommendation_body(
    reporter: &ReporterProfile,
    content: &ContentProfile,
    score: f64,
    urgent: bool,
) -> String {
    let name = &reporter.name;
    let honorific = honorific(reporter);
    let urgency = if urgent { PRIORITY_PHRASE } else { "" };

    format!(
        "{name}{honorific}

いつもお世話になっております。
リクルート広報担当です。

{summary}

{company}でご活躍の{name}{honorific}の専門性に非常に適した内容と判断し、{urgency}取材をご提案させていただきます。

マッチングスコア: {score}点

詳細についてご説明の機会をいただければ幸いです。
お忙しい中恐縮ですが、ご検討のほどよろしくお願いいたします。

リクルート広報チーム",
        summary = content.summary,
        company = reporter.company,
    )
}

/// Draft an interview request for one reporter
pub fn generate_interview_request(
    reporter: &ReporterProfile,
    content: &ContentProfile,
    score: f64,
    urgent_threshold: f64,
    reason_threshold: f64,
) -> Generated<InterviewRequestDraft> {
    tracing::debug!("Generating interview request for {}", reporter.name);

    let result = check_reporter(reporter).map(|_| InterviewRequestDraft {
        subject: format!(
            "{}{} - {}様向けご提案",
            INTERVIEW_PREFIX, content.title, reporter.company
        ),
        body: interview_body(reporter, content, score),
        matching_reasons: interview_reasons(reporter, content, score, reason_threshold),
        tone: select_tone(score, urgent_threshold),
    });

    let generated = Generated::or_fallback(result, || InterviewRequestDraft {
        subject: format!("{}{}", INTERVIEW_PREFIX, content.title),
        body: "インタビュー依頼文の生成に失敗しました。".to_string(),
        matching_reasons: vec!["生成エラー".to_string()],
        tone: DraftTone::Formal,
    });

    if let Some(cause) = generated.cause() {
        tracing::warn!("Interview request generation failed: {}", cause);
    }

    generated
}

fn interview_body(reporter: &ReporterProfile, content: &ContentProfile, score: f64) -> String {
    let name = &reporter.name;
    let honorific = honorific(reporter);

    format!(
        "{name}{honorific}

いつもお世話になっております。
企業広報担当です。

この度、弊社では「{title}」に関する取り組みについて、ぜひ{name}{honorific}にインタビューをお願いしたく、ご連絡いたします。

【なぜ{name}{honorific}にお願いしたいか】
{name}{honorific}が{company}で執筆されている記事の専門性と今回の内容が非常に高い親和性を持っているため、読者の皆様にとって価値のある記事になると確信しております。

【内容概要】
{summary}

【インタビュー形式】
- 所要時間: 30-45分程度
- 形式: オンライン・対面どちらでも対応可能
- 日程: {name}{honorific}のご都合に合わせて調整いたします

マッチング度: {score}点

詳細な資料や追加情報をご用意しておりますので、ご興味をお持ちいただけましたら、お気軽にお声がけください。

何卒よろしくお願いいたします。

企業広報部",
        title = content.title,
        company = reporter.company,
        summary = content.summary,
    )
}

/// Reasons shown alongside an interview request, at most four
///
/// Checks are case-sensitive and independent of the matching score reasons.
fn interview_reasons(
    reporter: &ReporterProfile,
    content: &ContentProfile,
    score: f64,
    reason_threshold: f64,
) -> Vec<String> {
    let mentions = |term: &str| content.title.contains(term) || content.body.contains(term);
    let mut reasons = Vec::new();

    if reporter.company.contains("IT") || reporter.company.contains("テック") {
        reasons.push("IT・テクノロジー分野の専門性".to_string());
    }
    if mentions("AI") {
        reasons.push("AI技術への深い理解と取材実績".to_string());
    }
    if mentions("DX") {
        reasons.push("DX・デジタル変革分野での豊富な執筆経験".to_string());
    }
    if score >= reason_threshold {
        reasons.push("記事内容と専門分野の高い一致度".to_string());
    }

    reasons.push(format!("{}の読者層との親和性", reporter.company));
    reasons.push("過去の取材実績と記事品質".to_string());

    reasons.truncate(MAX_INTERVIEW_REASONS);
    reasons
}
