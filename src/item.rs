use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Offset of India Standard Time from UTC (+05:30).
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The canonical zone every `published_at` is expressed in.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within range")
}

/// Current time in the canonical zone.
pub fn now_ist() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&ist())
}

/// Convert any zoned timestamp into the canonical zone.
pub fn to_ist<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<FixedOffset> {
    dt.with_timezone(&ist())
}

/// One headline from one source, valid for a single aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// Name of the source this came from.
    pub source: String,
    pub title: String,
    pub link: String,
    pub published_at: DateTime<FixedOffset>,
    pub summary: Option<String>,
    pub image: Option<String>,
}
