//! Description enrichment for trails that arrive without usable text.
//!
//! Fetches each trail's source page, strips the markup by hand and picks
//! the sentences most likely to describe the hike. No HTML parser crate;
//! the pages involved are simple enough that a scanner suffices.

use crate::constants::{
    ENRICHMENT_KEYWORDS, FALLBACK_DESCRIPTION_LENGTH, MAX_DESCRIPTION_LENGTH,
    MIN_DESCRIPTION_LENGTH,
};
use crate::db::poi_queries;
use crate::error::Result;
use crate::models::Poi;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Default, Serialize)]
pub struct EnrichmentSummary {
    /// Trails attempted in this batch.
    pub processed: usize,
    /// Trails that received a new description.
    pub enriched: usize,
    /// Trails still lacking a description after this batch.
    pub remaining: usize,
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Byte index of an ASCII needle, case-insensitive. A hit is all-ASCII, so
/// slicing at the returned index is always char-boundary safe.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Remove markup from an HTML document: script and style blocks are dropped
/// wholesale, tags become whitespace, common entities are decoded and runs
/// of whitespace collapse to a single space.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len() / 2);
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        rest = &rest[open..];

        if starts_with_ci(rest, "<script") || starts_with_ci(rest, "<style") {
            let closing = if starts_with_ci(rest, "<script") {
                "</script>"
            } else {
                "</style>"
            };
            match find_ci(rest, closing) {
                Some(end) => rest = &rest[end + closing.len()..],
                None => rest = "",
            }
            text.push(' ');
            continue;
        }

        match rest.find('>') {
            Some(end) => {
                rest = &rest[end + 1..];
                text.push(' ');
            }
            // Dangling '<' with no closing bracket, drop the remainder
            None => rest = "",
        }
    }
    text.push_str(rest);

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Score a sentence by enrichment keywords, with a strong bonus when the
/// trail's own name appears in it.
fn score_sentence(sentence: &str, trail_name: &str) -> usize {
    let lower = sentence.to_lowercase();
    let mut score = ENRICHMENT_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .count();
    if !trail_name.is_empty() && lower.contains(&trail_name.to_lowercase()) {
        score += 3;
    }
    score
}

/// Truncate at a char boundary at or below `max` bytes.
fn truncate_chars(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Pick descriptive sentences out of stripped page text.
///
/// Sentences are scored, the best ones kept until the budget is spent, then
/// re-joined in their original order. When nothing scores, falls back to a
/// plain prefix of the page text. Returns None when the page has no usable
/// text at all.
pub fn extract_clean_description(text: &str, trail_name: &str) -> Option<String> {
    let sentences: Vec<&str> = text
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.len() >= 20 && s.len() <= 400)
        .collect();

    let mut scored: Vec<(usize, &str, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| (i, *s, score_sentence(s, trail_name)))
        .filter(|(_, _, score)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    let mut picked: Vec<(usize, &str)> = Vec::new();
    let mut budget = 0usize;
    for (i, sentence, _) in scored {
        if budget + sentence.len() + 1 > MAX_DESCRIPTION_LENGTH {
            continue;
        }
        budget += sentence.len() + 1;
        picked.push((i, sentence));
    }

    if !picked.is_empty() {
        picked.sort_by_key(|(i, _)| *i);
        let description = picked
            .into_iter()
            .map(|(_, s)| s)
            .collect::<Vec<_>>()
            .join(" ");
        return Some(description);
    }

    let trimmed = text.trim();
    if trimmed.len() >= MIN_DESCRIPTION_LENGTH {
        return Some(truncate_chars(trimmed, FALLBACK_DESCRIPTION_LENGTH).trim_end().to_string());
    }
    None
}

/// Fetch one trail's source page and store an extracted description.
/// Returns whether the trail was actually enriched. Network failures are
/// logged and treated as a miss so a dead link cannot fail the batch.
pub async fn enrich_trail(
    pool: &SqlitePool,
    client: &reqwest::Client,
    trail: &Poi,
) -> Result<bool> {
    let Some(url) = &trail.url else {
        tracing::debug!("Trail '{}' has no source URL, skipping", trail.name);
        return Ok(false);
    };

    let html = match client.get(url).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read page for trail '{}': {}", trail.name, e);
                return Ok(false);
            }
        },
        Ok(response) => {
            tracing::warn!(
                "Page for trail '{}' returned status {}",
                trail.name,
                response.status()
            );
            return Ok(false);
        }
        Err(e) => {
            tracing::warn!("Failed to fetch page for trail '{}': {}", trail.name, e);
            return Ok(false);
        }
    };

    let text = strip_html(&html);
    let Some(description) = extract_clean_description(&text, &trail.name) else {
        tracing::debug!("No usable description found for trail '{}'", trail.name);
        return Ok(false);
    };

    poi_queries::update_description(pool, trail.id, &description).await?;
    tracing::info!("Enriched description for trail '{}'", trail.name);
    Ok(true)
}

/// Enrich up to `limit` trails that currently lack a description.
pub async fn batch_enrich(
    pool: &SqlitePool,
    client: &reqwest::Client,
    limit: usize,
) -> Result<EnrichmentSummary> {
    let Some(category_id) = poi_queries::trails_category_id(pool).await? else {
        tracing::error!("Trails category not found in the database");
        return Ok(EnrichmentSummary::default());
    };

    let candidates = poi_queries::trails_without_descriptions(pool, category_id).await?;
    let total = candidates.len();

    let mut summary = EnrichmentSummary {
        processed: 0,
        enriched: 0,
        remaining: total,
    };

    for trail in candidates.iter().take(limit) {
        summary.processed += 1;
        if enrich_trail(pool, client, trail).await? {
            summary.enriched += 1;
        }
    }
    summary.remaining = total - summary.enriched;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_drops_tags_scripts_and_entities() {
        let html = "<html><head><style>body { color: red; }</style>\
                    <script>var x = 1 < 2;</script></head>\
                    <body><h1>Vallesinella</h1>\
                    <p>An easy &amp; scenic trail.</p></body></html>";
        let text = strip_html(html);
        assert_eq!(text, "Vallesinella An easy & scenic trail.");
    }

    #[test]
    fn strip_html_tolerates_unclosed_tags() {
        assert_eq!(strip_html("before <broken"), "before");
        assert_eq!(strip_html("plain text"), "plain text");
    }

    #[test]
    fn extract_prefers_keyword_rich_sentences_in_source_order() {
        let text = "Cookie banner text that says nothing useful whatsoever here. \
                    The Vallesinella trail is a scenic hiking route through alpine woods. \
                    Subscribe to our newsletter for updates and promotions today. \
                    The path gains little elevation and suits families with children.";
        let description = extract_clean_description(text, "Vallesinella").unwrap();

        assert!(description.contains("scenic hiking route"));
        assert!(description.contains("suits families"));
        assert!(!description.contains("newsletter"));
        // Source order is preserved
        let a = description.find("scenic hiking route").unwrap();
        let b = description.find("suits families").unwrap();
        assert!(a < b);
        assert!(description.len() <= MAX_DESCRIPTION_LENGTH);
    }

    #[test]
    fn extract_falls_back_to_a_prefix_when_nothing_scores() {
        let filler = "Lorem ipsum dolor sit amet consectetur adipiscing elit sed do ".repeat(20);
        let description = extract_clean_description(&filler, "Vallesinella").unwrap();
        assert!(description.len() <= FALLBACK_DESCRIPTION_LENGTH);
        assert!(description.len() >= MIN_DESCRIPTION_LENGTH);
    }

    #[test]
    fn extract_returns_none_for_empty_pages() {
        assert!(extract_clean_description("", "Trail").is_none());
        assert!(extract_clean_description("Too short.", "Trail").is_none());
    }
}
