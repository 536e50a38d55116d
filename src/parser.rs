//! Turns raw feed documents into [`FeedItem`]s with canonical timestamps.
//!
//! Any format `feed-rs` understands (RSS 0.9x/1.0/2.0, Atom, JSON Feed) is
//! accepted. Published time falls back to the entry's updated time and then
//! to the fetch time, so every item sorts.

use chrono::{DateTime, FixedOffset};
use feed_rs::model::Entry;
use feed_rs::parser;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::item::{to_ist, FeedItem};
use crate::registry::Source;

const UNTITLED: &str = "Untitled";

pub fn parse_feed(
    bytes: &[u8],
    source: &Source,
    fetched_at: DateTime<FixedOffset>,
) -> Result<Vec<FeedItem>, ParseError> {
    let parsed = parser::parse(bytes).map_err(|e| ParseError::Malformed {
        source_name: source.name.clone(),
        reason: e.to_string(),
    })?;

    debug!("{}: {} entries in document", source.name, parsed.entries.len());

    let fetched_at = to_ist(&fetched_at);
    let mut items = Vec::with_capacity(parsed.entries.len());
    for entry in &parsed.entries {
        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let Some(link) = main_link(entry) else {
            warn!("Skipping entry with no link: {}", title);
            continue;
        };

        let published_at = entry
            .published
            .or(entry.updated)
            .map(|dt| to_ist(&dt))
            .unwrap_or(fetched_at);

        items.push(FeedItem {
            source: source.name.clone(),
            title,
            link,
            published_at,
            summary: entry.summary.as_ref().and_then(|s| plain_text(&s.content)),
            image: extract_image(entry),
        });
    }

    Ok(items)
}

/// The story link: the first `alternate` (or unlabelled) link, else the first one.
fn main_link(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Image URL from media content, then media thumbnails, then `image/*` links.
pub fn extract_image(entry: &Entry) -> Option<String> {
    let from_content = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter(|c| {
            c.content_type
                .as_ref()
                .map_or(true, |mime| mime.ty().as_str() == "image")
        })
        .find_map(|c| c.url.as_ref().map(|u| u.to_string()));

    let from_thumbnail = || {
        entry
            .media
            .iter()
            .flat_map(|m| m.thumbnails.iter())
            .map(|t| t.image.uri.trim().to_string())
            .find(|uri| !uri.is_empty())
    };

    let from_links = || {
        entry
            .links
            .iter()
            .filter(|l| {
                l.media_type
                    .as_deref()
                    .is_some_and(|t| t.starts_with("image/"))
            })
            .map(|l| l.href.trim().to_string())
            .find(|href| !href.is_empty())
    };

    from_content.or_else(from_thumbnail).or_else(from_links)
}

/// Strip markup, decode entities and collapse whitespace; `None` when nothing
/// readable remains.
fn plain_text(html: &str) -> Option<String> {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    // Decode after stripping so escaped markup survives as text.
    let decoded = html_escape::decode_html_entities(&text);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}
