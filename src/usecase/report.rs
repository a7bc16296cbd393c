use crate::domain::config::{DedupConfig, DedupStrategy};
use crate::domain::model::{BookmarkRecord, RejectedLink};
use crate::infrastructure::report_json::{
    BookmarkEntryDto, DuplicateGroupDto, GroupEntryDto, RejectedLinkDto, ReportConfigDto,
    ReportFileDto, ReportSummaryDto,
};
use crate::usecase::dedup::label::TitleCleaner;
use crate::usecase::dedup::DedupResult;
use std::collections::HashMap;
use std::fmt::Write as _;

/// JSON report for one run. `records` is the full input the result was computed from;
/// Links in `rejected` never became records and stay outside the input accounting.
pub fn build_report(
    records: &[BookmarkRecord],
    rejected: &[RejectedLink],
    result: &DedupResult,
    config: &DedupConfig,
    generated_at_ms: u64,
) -> ReportFileDto {
    let by_index: HashMap<usize, &BookmarkRecord> =
        records.iter().map(|r| (r.source_index(), r)).collect();
    let entry = |idx: usize| GroupEntryDto {
        source_index: idx,
        url: by_index.get(&idx).map(|r| r.url().to_string()).unwrap_or_default(),
        title: by_index
            .get(&idx)
            .map(|r| r.title().to_string())
            .unwrap_or_default(),
    };

    let duplicate_groups = result
        .groups
        .iter()
        .map(|o| DuplicateGroupDto {
            strategy: o.group.strategy.to_string(),
            score: o.group.score,
            kept: entry(o.kept),
            removed: o.removed.iter().map(|&i| entry(i)).collect(),
        })
        .collect();

    let titles = TitleCleaner::from_config(config);
    let bookmarks = result
        .labeled()
        .map(|(r, label)| BookmarkEntryDto {
            source_index: r.source_index(),
            original_title: r.title().to_string(),
            clean_title: titles.clean_or_fallback(r.title(), &label.domain),
            label: label.to_string(),
            domain: label.domain.clone(),
            url: r.url().to_string(),
            folder_path: r.folder_path().to_vec(),
        })
        .collect();

    ReportFileDto {
        generated_at_ms,
        config: ReportConfigDto {
            strategy: config.strategy.to_string(),
            keep_strategy: config.keep_strategy.to_string(),
            similarity_threshold: config.similarity_threshold,
        },
        summary: ReportSummaryDto {
            total_input: result.stats.total_input,
            survivors: result.stats.survivors,
            total_removed: result.stats.total_removed,
            group_count: result.stats.group_count,
            malformed_urls: result.stats.malformed_urls,
            rejected_links: rejected.len(),
        },
        duplicate_groups,
        bookmarks,
        rejected_links: rejected
            .iter()
            .map(|r| RejectedLinkDto {
                href: r.href.clone(),
                title: r.title.clone(),
                reason: r.reason.to_string(),
            })
            .collect(),
    }
}

/// Human-readable duplicate analysis.
pub fn render_text_report(
    records: &[BookmarkRecord],
    rejected: &[RejectedLink],
    result: &DedupResult,
    config: &DedupConfig,
) -> String {
    let by_index: HashMap<usize, &BookmarkRecord> =
        records.iter().map(|r| (r.source_index(), r)).collect();
    let describe = |idx: usize| match by_index.get(&idx) {
        Some(r) if r.title().trim().is_empty() => format!("[{idx}] {}", r.url()),
        Some(r) => format!("[{idx}] {} ({})", r.title().trim(), r.url()),
        None => format!("[{idx}]"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Duplicate Analysis Report");
    let _ = writeln!(out, "=========================");
    let _ = writeln!(out, "Strategy: {}", config.strategy);
    let _ = writeln!(out, "Keep strategy: {}", config.keep_strategy);
    if config.strategy == DedupStrategy::Fuzzy {
        let _ = writeln!(out, "Similarity threshold: {:.2}", config.similarity_threshold);
    }
    let _ = writeln!(out, "Total bookmarks: {}", result.stats.total_input);
    let _ = writeln!(out, "Duplicates removed: {}", result.stats.total_removed);
    let _ = writeln!(out, "Duplicate groups: {}", result.stats.group_count);
    let _ = writeln!(out, "Malformed URLs: {}", result.stats.malformed_urls);
    let _ = writeln!(out, "Rejected links: {}", rejected.len());
    for link in rejected {
        let _ = writeln!(out, "  REJECT {} ({})", link.href, link.reason);
    }

    if result.groups.is_empty() {
        let _ = writeln!(out, "\nNo duplicates found.");
        return out;
    }

    for (n, outcome) in result.groups.iter().enumerate() {
        let _ = write!(out, "\nGroup {} ({} bookmarks", n + 1, outcome.group.len());
        if let Some(score) = outcome.group.score {
            let _ = write!(out, ", score {score:.2}");
        }
        let _ = writeln!(out, "):");
        let _ = writeln!(out, "  KEEP   {}", describe(outcome.kept));
        for &idx in &outcome.removed {
            let _ = writeln!(out, "  REMOVE {}", describe(idx));
        }
    }
    out
}
