use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{FetchError, SourceError};
use crate::fetcher::Fetcher;
use crate::item::{now_ist, FeedItem};
use crate::parser::parse_feed;
use crate::registry::{Source, SourceRegistry};
use crate::window::WindowFilter;

/// What one source contributed to an aggregation run.
#[derive(Debug)]
pub enum SourceOutcome {
    /// Items that survived the window filter.
    Success(Vec<FeedItem>),
    Failure(SourceError),
}

impl SourceOutcome {
    pub fn items(&self) -> &[FeedItem] {
        match self {
            SourceOutcome::Success(items) => items,
            SourceOutcome::Failure(_) => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SourceOutcome::Failure(_))
    }
}

#[derive(Debug)]
pub struct SourceReport {
    pub source: Source,
    pub outcome: SourceOutcome,
}

/// Merged output of one run, plus the per-source outcomes it was built from.
#[derive(Debug)]
pub struct AggregatedResult {
    pub generated_at: DateTime<FixedOffset>,
    /// All selected items, newest first.
    pub items: Vec<FeedItem>,
    /// One report per configured source, in registry order.
    pub sources: Vec<SourceReport>,
}

impl AggregatedResult {
    /// Filtered items keyed by source name. Failed sources map to an empty slice.
    pub fn grouped(&self) -> BTreeMap<&str, &[FeedItem]> {
        self.sources
            .iter()
            .map(|r| (r.source.name.as_str(), r.outcome.items()))
            .collect()
    }

    pub fn failed_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|r| r.outcome.is_failure())
            .map(|r| r.source.name.as_str())
            .collect()
    }

    /// Distinct source names present in `items`, sorted.
    pub fn source_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.items.iter().map(|i| i.source.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

pub struct Aggregator {
    registry: SourceRegistry,
    fetcher: Fetcher,
    filter: WindowFilter,
    max_items: Option<usize>,
    deadline: Option<Duration>,
}

impl Aggregator {
    pub fn new(
        registry: SourceRegistry,
        fetcher: Fetcher,
        filter: WindowFilter,
        max_items: Option<usize>,
        deadline: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            filter,
            max_items,
            deadline,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(
            SourceRegistry::from_config(config),
            Fetcher::from_config(config)?,
            WindowFilter::from_config(config),
            config.max_items,
            config.aggregate_timeout(),
        ))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn window(&self) -> chrono::Duration {
        self.filter.window()
    }

    pub async fn aggregate(&self) -> AggregatedResult {
        self.aggregate_at(now_ist()).await
    }

    /// Run every source concurrently against a fixed "now", then merge.
    pub async fn aggregate_at(&self, now: DateTime<FixedOffset>) -> AggregatedResult {
        let mut pending: FuturesUnordered<_> = self
            .registry
            .iter()
            .enumerate()
            .map(|(idx, source)| async move { (idx, self.run_source(source, now).await) })
            .collect();

        let mut outcomes: Vec<Option<SourceOutcome>> =
            (0..self.registry.len()).map(|_| None).collect();

        match self.deadline {
            Some(limit) => {
                let deadline = tokio::time::Instant::now() + limit;
                loop {
                    match tokio::time::timeout_at(deadline, pending.next()).await {
                        Ok(Some((idx, outcome))) => outcomes[idx] = Some(outcome),
                        Ok(None) => break,
                        Err(_) => {
                            warn!(
                                "Aggregation deadline of {:?} reached with {} source(s) pending",
                                limit,
                                pending.len()
                            );
                            break;
                        }
                    }
                }
            }
            None => {
                while let Some((idx, outcome)) = pending.next().await {
                    outcomes[idx] = Some(outcome);
                }
            }
        }
        drop(pending);

        let sources: Vec<SourceReport> = self
            .registry
            .iter()
            .zip(outcomes)
            .map(|(source, outcome)| SourceReport {
                source: source.clone(),
                outcome: outcome
                    .unwrap_or_else(|| SourceOutcome::Failure(SourceError::DeadlineExceeded)),
            })
            .collect();

        let items = merge(&sources, self.max_items);
        log_counts(&sources, &items);

        AggregatedResult {
            generated_at: now,
            items,
            sources,
        }
    }

    async fn run_source(&self, source: &Source, now: DateTime<FixedOffset>) -> SourceOutcome {
        match self.collect_source(source, now).await {
            Ok(items) => SourceOutcome::Success(items),
            Err(e) => {
                warn!("Source '{}' contributed nothing: {}", source.name, e);
                SourceOutcome::Failure(e)
            }
        }
    }

    async fn collect_source(
        &self,
        source: &Source,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<FeedItem>, SourceError> {
        let bytes = self.fetcher.fetch(source).await?;
        let parsed = parse_feed(&bytes, source, now)?;
        let total = parsed.len();
        let selected = self.filter.apply(parsed, now);
        info!(
            "{}: {} parsed, {} selected",
            source.name,
            total,
            selected.len()
        );
        Ok(selected)
    }
}

/// Newest first; equal timestamps order by source name, then title.
pub fn compare_items(a: &FeedItem, b: &FeedItem) -> Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.title.cmp(&b.title))
}

/// Concatenate every successful source's items, sort, and trim.
pub fn merge(reports: &[SourceReport], max_items: Option<usize>) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = reports
        .iter()
        .flat_map(|r| r.outcome.items().iter().cloned())
        .collect();

    items.sort_by(compare_items);

    if let Some(limit) = max_items {
        items.truncate(limit);
    }
    items
}

fn log_counts(reports: &[SourceReport], items: &[FeedItem]) {
    let mut per_source: BTreeMap<&str, usize> = BTreeMap::new();
    for item in items {
        *per_source.entry(item.source.as_str()).or_insert(0) += 1;
    }

    let failed = reports.iter().filter(|r| r.outcome.is_failure()).count();
    info!(
        "Aggregated {} items from {}/{} sources: {:?}",
        items.len(),
        reports.len() - failed,
        reports.len(),
        per_source
    );
}
