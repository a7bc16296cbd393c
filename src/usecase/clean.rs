use crate::domain::config::DedupConfig;
use crate::domain::model::{BookmarkRecord, RejectedLink};
use crate::domain::traits::{ComponentDetector, UrlNormalizer};
use crate::usecase::dedup::{dedupe, DedupResult};
use crate::usecase::event::AppEvent;
use anyhow::{Context, Result};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Run the dedup engine over parsed records, streaming progress to `sink`.
///
/// `rejected` are the anchors the parser refused; each gets a `LinkRejected`
/// event right after `RecordsParsed`. Configuration errors abort before the
/// dedupe phase finishes.
pub async fn clean_bookmarks(
    records: &[BookmarkRecord],
    rejected: &[RejectedLink],
    config: &DedupConfig,
    normalizer: &dyn UrlNormalizer,
    components: &dyn ComponentDetector,
    sink: Option<mpsc::Sender<AppEvent>>,
) -> Result<DedupResult> {
    emit(
        &sink,
        AppEvent::RecordsParsed {
            count: records.len(),
        },
    )
    .await;
    for link in rejected {
        emit(
            &sink,
            AppEvent::LinkRejected {
                href: link.href.clone(),
                title: link.title.clone(),
                reason: link.reason.to_string(),
            },
        )
        .await;
    }

    emit(
        &sink,
        AppEvent::PhaseStarted {
            name: "dedupe".into(),
        },
    )
    .await;
    let result = dedupe(records, config, normalizer, components)
        .with_context(|| format!("invalid configuration for strategy {}", config.strategy))?;
    emit(
        &sink,
        AppEvent::PhaseFinished {
            name: "dedupe".into(),
        },
    )
    .await;

    let by_index: HashMap<usize, &BookmarkRecord> =
        records.iter().map(|r| (r.source_index(), r)).collect();
    let url_of = |idx: usize| {
        by_index
            .get(&idx)
            .map(|r| r.url().to_string())
            .unwrap_or_default()
    };

    for &idx in &result.malformed {
        emit(
            &sink,
            AppEvent::MalformedUrl {
                source_index: idx,
                url: url_of(idx),
            },
        )
        .await;
    }

    emit(
        &sink,
        AppEvent::DuplicatesGrouped {
            strategy: config.strategy.to_string(),
            groups: result.groups.len(),
        },
    )
    .await;
    for outcome in &result.groups {
        emit(
            &sink,
            AppEvent::DuplicateRemoved {
                kept_url: url_of(outcome.kept),
                removed_urls: outcome.removed.iter().map(|&i| url_of(i)).collect(),
                score: outcome.group.score,
            },
        )
        .await;
    }

    emit(
        &sink,
        AppEvent::LabelsAssigned {
            count: result.labels.len(),
        },
    )
    .await;

    emit(
        &sink,
        AppEvent::Finished {
            stats: result.stats.clone(),
        },
    )
    .await;
    Ok(result)
}

async fn emit(sink: &Option<mpsc::Sender<AppEvent>>, ev: AppEvent) {
    if let Some(tx) = sink {
        let _ = tx.send(ev).await;
    }
}
