use crate::core::outcome::{check_content, Generated};
use crate::models::{ContentProfile, TagRule, TagSuggestion};

/// Suggest tags for a content item
///
/// Each rule in `rules` fires when one of its triggers occurs in the
/// lowercased `title summary body` text. Output keeps rule order and uses the
/// rule's fixed confidence. Invalid content falls back to an empty list.
pub fn suggest_tags(content: &ContentProfile, rules: &[TagRule]) -> Generated<Vec<TagSuggestion>> {
    tracing::debug!("Suggesting tags for content: {}", content.title);

    let result = check_content(content).map(|_| {
        let text = format!("{} {} {}", content.title, content.summary, content.body).to_lowercase();

        rules
            .iter()
            .filter(|rule| {
                rule.triggers
                    .iter()
                    .any(|trigger| text.contains(&trigger.to_lowercase()))
            })
            .map(TagRule::suggestion)
            .collect::<Vec<_>>()
    });

    let generated = Generated::or_fallback(result, Vec::new);

    match &generated {
        Generated::Fresh(tags) => tracing::debug!("Suggested {} tags for {}", tags.len(), content.id),
        Generated::Fallback { cause, .. } => tracing::warn!("Tag suggestion failed: {}", cause),
    }

    generated
}
