/// Vocabulary terms present in `text`, in vocabulary order
///
/// Matching is a case-insensitive substring check, so "IT" is found in
/// "ITmedia" and "AI" in "Mainichi".
pub fn extract_keywords<'a>(text: &str, vocabulary: &'a [String]) -> Vec<&'a str> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .map(|keyword| keyword.as_str())
        .collect()
}

/// Reporter keywords contained in at least one content keyword
///
/// The check is one-directional: a reporter keyword counts when some content
/// keyword contains it, not the other way round.
pub fn overlapping_keywords<'a>(
    reporter_keywords: &[&'a str],
    content_keywords: &[&str],
) -> Vec<&'a str> {
    reporter_keywords
        .iter()
        .filter(|keyword| {
            let needle = keyword.to_lowercase();
            content_keywords
                .iter()
                .any(|content_keyword| content_keyword.to_lowercase().contains(&needle))
        })
        .copied()
        .collect()
}
