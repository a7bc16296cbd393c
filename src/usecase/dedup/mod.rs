//! Duplicate detection + label normalization. Pure and synchronous.

pub mod group;
pub mod keep;
pub mod label;
pub mod score;

use crate::domain::config::DedupConfig;
use crate::domain::error::ConfigError;
use crate::domain::model::{BookmarkRecord, CleanedLabel, GroupOutcome};
use crate::domain::traits::{ComponentDetector, UrlNormalizer};
use crate::usecase::stats::DedupStats;
use group::{group_records, GroupingContext};
use keep::resolve_keep;
use label::{label_domain, LabelCleaner, LabelRegistry, TitleCleaner};
use score::WeightedScorer;
use std::collections::{HashMap, HashSet};

/// Output of one dedup run. Survivors keep their input order; `labels[i]` belongs to `survivors[i]`.
#[derive(Debug, Clone)]
pub struct DedupResult {
    pub survivors: Vec<BookmarkRecord>,
    pub labels: Vec<CleanedLabel>,
    pub groups: Vec<GroupOutcome>,
    /// Source indices whose URL could not be parsed.
    pub malformed: Vec<usize>,
    pub stats: DedupStats,
}

impl DedupResult {
    pub fn labeled(&self) -> impl Iterator<Item = (&BookmarkRecord, &CleanedLabel)> {
        self.survivors.iter().zip(self.labels.iter())
    }
}

pub fn dedupe(
    records: &[BookmarkRecord],
    config: &DedupConfig,
    normalizer: &dyn UrlNormalizer,
    components: &dyn ComponentDetector,
) -> Result<DedupResult, ConfigError> {
    config.validate()?;

    let titles = TitleCleaner::from_config(config);
    let ctx = GroupingContext {
        normalizer,
        scorer: &WeightedScorer,
        components,
    };

    let groups = group_records(records, config.strategy, config.similarity_threshold, &ctx);

    let by_index: HashMap<usize, &BookmarkRecord> =
        records.iter().map(|r| (r.source_index(), r)).collect();
    // Same title the label will carry.
    let title_len = |idx: usize| {
        by_index.get(&idx).map_or(0, |r| {
            titles
                .clean_or_fallback(r.title(), &label_domain(r.url()))
                .chars()
                .count()
        })
    };

    let mut removed: HashSet<usize> = HashSet::new();
    let mut outcomes: Vec<GroupOutcome> = Vec::with_capacity(groups.len());
    for group in groups {
        let Some(kept) = resolve_keep(&group, config.keep_strategy, title_len) else {
            continue;
        };
        let losers: Vec<usize> = group
            .members
            .iter()
            .copied()
            .filter(|&m| m != kept)
            .collect();
        removed.extend(losers.iter().copied());
        outcomes.push(GroupOutcome {
            group,
            kept,
            removed: losers,
        });
    }

    let survivors: Vec<BookmarkRecord> = records
        .iter()
        .filter(|r| !removed.contains(&r.source_index()))
        .cloned()
        .collect();

    let labeler = LabelCleaner::new(titles.clone());
    let mut registry = LabelRegistry::default();
    let labels: Vec<CleanedLabel> = survivors
        .iter()
        .map(|r| labeler.clean(r, &mut registry))
        .collect();

    let malformed: Vec<usize> = records
        .iter()
        .filter(|r| normalizer.normalize(r.url()).is_malformed())
        .map(|r| r.source_index())
        .collect();

    let stats = DedupStats {
        total_input: records.len(),
        survivors: survivors.len(),
        total_removed: records.len() - survivors.len(),
        group_count: outcomes.len(),
        malformed_urls: malformed.len(),
    };

    Ok(DedupResult {
        survivors,
        labels,
        groups: outcomes,
        malformed,
        stats,
    })
}
