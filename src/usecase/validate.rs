use crate::infrastructure::report_json::ReportFileDto;
use crate::infrastructure::schema_validator::validate_report_schema;
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, BTreeSet};

/// Check a written report against the schema and the accounting invariants:
/// every input index appears exactly once, counts add up, labels are unique.
pub fn validate_report(dto: &ReportFileDto) -> Result<()> {
    let value = serde_json::to_value(dto)?;
    validate_report_schema(&value)?;

    let s = &dto.summary;
    if s.survivors != dto.bookmarks.len() {
        return Err(anyhow!(
            "summary.survivors is {} but the report lists {} bookmarks",
            s.survivors,
            dto.bookmarks.len()
        ));
    }
    if s.survivors + s.total_removed != s.total_input {
        return Err(anyhow!(
            "survivors ({}) + removed ({}) must equal total input ({})",
            s.survivors,
            s.total_removed,
            s.total_input
        ));
    }
    if s.group_count != dto.duplicate_groups.len() {
        return Err(anyhow!(
            "summary.group_count is {} but the report lists {} groups",
            s.group_count,
            dto.duplicate_groups.len()
        ));
    }

    if s.rejected_links != dto.rejected_links.len() {
        return Err(anyhow!(
            "summary.rejected_links is {} but the report lists {} rejected links",
            s.rejected_links,
            dto.rejected_links.len()
        ));
    }

    let removed_total: usize = dto.duplicate_groups.iter().map(|g| g.removed.len()).sum();
    if removed_total != s.total_removed {
        return Err(anyhow!(
            "groups remove {removed_total} bookmarks but summary.total_removed is {}",
            s.total_removed
        ));
    }

    let mut seen: BTreeSet<usize> = BTreeSet::new();
    for b in &dto.bookmarks {
        if !seen.insert(b.source_index) {
            return Err(anyhow!("bookmark index listed twice: {}", b.source_index));
        }
    }
    let survivors = seen.clone();
    for g in &dto.duplicate_groups {
        if !survivors.contains(&g.kept.source_index) {
            return Err(anyhow!(
                "kept bookmark {} is missing from the survivor list",
                g.kept.source_index
            ));
        }
        for r in &g.removed {
            if !seen.insert(r.source_index) {
                return Err(anyhow!("bookmark index accounted for twice: {}", r.source_index));
            }
        }
    }

    let mut label_owner: BTreeMap<&str, usize> = BTreeMap::new();
    for b in &dto.bookmarks {
        if let Some(prev) = label_owner.insert(b.label.as_str(), b.source_index) {
            return Err(anyhow!(
                "label must be unique: {:?} (bookmarks {prev} and {})",
                b.label,
                b.source_index
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::report_json::{
        BookmarkEntryDto, DuplicateGroupDto, GroupEntryDto, RejectedLinkDto, ReportConfigDto,
        ReportSummaryDto,
    };

    fn bookmark(idx: usize, label: &str) -> BookmarkEntryDto {
        BookmarkEntryDto {
            source_index: idx,
            original_title: "T".to_string(),
            clean_title: "T".to_string(),
            label: label.to_string(),
            domain: "a.com".to_string(),
            url: format!("https://a.com/{idx}"),
            folder_path: vec![],
        }
    }

    fn entry(idx: usize) -> GroupEntryDto {
        GroupEntryDto {
            source_index: idx,
            url: "https://a.com/x".to_string(),
            title: "T".to_string(),
        }
    }

    fn valid() -> ReportFileDto {
        ReportFileDto {
            generated_at_ms: 1,
            config: ReportConfigDto {
                strategy: "url".to_string(),
                keep_strategy: "first".to_string(),
                similarity_threshold: 0.85,
            },
            summary: ReportSummaryDto {
                total_input: 3,
                survivors: 2,
                total_removed: 1,
                group_count: 1,
                malformed_urls: 0,
                rejected_links: 1,
            },
            duplicate_groups: vec![DuplicateGroupDto {
                strategy: "url".to_string(),
                score: None,
                kept: entry(0),
                removed: vec![entry(2)],
            }],
            bookmarks: vec![bookmark(0, "a.com | T"), bookmark(1, "a.com | T (X)")],
            rejected_links: vec![RejectedLinkDto {
                href: "javascript:void(0)".to_string(),
                title: "Bookmarklet".to_string(),
                reason: "blocked scheme: javascript".to_string(),
            }],
        }
    }

    #[test]
    fn validate_accepts_consistent_report() {
        validate_report(&valid()).expect("valid");
    }

    #[test]
    fn validate_rejects_duplicate_labels() {
        let mut dto = valid();
        dto.bookmarks[1].label = "a.com | T".to_string();
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("label must be unique"));
    }

    #[test]
    fn validate_rejects_broken_accounting() {
        let mut dto = valid();
        dto.summary.total_input = 4;
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("must equal total input"));
    }

    #[test]
    fn validate_rejects_index_both_kept_and_removed() {
        let mut dto = valid();
        dto.duplicate_groups[0].removed = vec![entry(1)];
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("accounted for twice"));
    }

    #[test]
    fn validate_rejects_kept_index_missing_from_survivors() {
        let mut dto = valid();
        dto.duplicate_groups[0].kept = entry(5);
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("missing from the survivor list"));
    }

    #[test]
    fn validate_rejects_rejected_count_mismatch() {
        let mut dto = valid();
        dto.rejected_links.clear();
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("summary.rejected_links is 1"));
    }

    #[test]
    fn validate_runs_schema_checks() {
        let mut dto = valid();
        dto.config.strategy = "bogus".to_string();
        let err = validate_report(&dto).unwrap_err().to_string();
        assert!(err.contains("Report validation failed"));
    }
}
