use chrono::{DateTime, Duration, FixedOffset};

use crate::config::Config;
use crate::item::FeedItem;

/// Selects the recent items of one source, never leaving a source with
/// parsed items unrepresented.
#[derive(Debug, Clone, Copy)]
pub struct WindowFilter {
    window: Duration,
    fallback_per_source: usize,
}

impl WindowFilter {
    pub fn new(window: Duration, fallback_per_source: usize) -> Self {
        Self {
            window,
            fallback_per_source: fallback_per_source.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.window(), config.fallback_per_source)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Items with `published_at >= now - window`, newest first. When none
    /// qualify, the `fallback_per_source` most recent items instead. Empty
    /// input stays empty.
    pub fn apply(&self, mut items: Vec<FeedItem>, now: DateTime<FixedOffset>) -> Vec<FeedItem> {
        if items.is_empty() {
            return items;
        }

        // Stable: equal timestamps keep feed order.
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let cutoff = now - self.window;
        let in_window = items
            .iter()
            .take_while(|item| item.published_at >= cutoff)
            .count();

        let keep = if in_window > 0 {
            in_window
        } else {
            self.fallback_per_source
        };
        items.truncate(keep);
        items
    }
}
