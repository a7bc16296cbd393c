use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFileDto {
    pub generated_at_ms: u64,
    pub config: ReportConfigDto,
    pub summary: ReportSummaryDto,
    #[serde(default)]
    pub duplicate_groups: Vec<DuplicateGroupDto>,
    #[serde(default)]
    pub bookmarks: Vec<BookmarkEntryDto>,
    #[serde(default)]
    pub rejected_links: Vec<RejectedLinkDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfigDto {
    pub strategy: String,
    pub keep_strategy: String,
    pub similarity_threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummaryDto {
    pub total_input: usize,
    pub survivors: usize,
    pub total_removed: usize,
    pub group_count: usize,
    pub malformed_urls: usize,
    #[serde(default)]
    pub rejected_links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroupDto {
    pub strategy: String,
    #[serde(default)]
    pub score: Option<f64>,
    pub kept: GroupEntryDto,
    pub removed: Vec<GroupEntryDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntryDto {
    pub source_index: usize,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEntryDto {
    pub source_index: usize,
    pub original_title: String,
    pub clean_title: String,
    pub label: String,
    pub domain: String,
    pub url: String,
    #[serde(default)]
    pub folder_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedLinkDto {
    pub href: String,
    pub title: String,
    pub reason: String,
}

pub async fn read_report_file(path: &str) -> Result<ReportFileDto> {
    let raw = fs::read_to_string(path).await?;
    let dto: ReportFileDto = serde_json::from_str(&raw)?;
    Ok(dto)
}

pub async fn write_report_file(path: &str, dto: &ReportFileDto) -> Result<()> {
    let pretty = serde_json::to_string_pretty(dto)?;
    fs::write(path, pretty).await?;
    Ok(())
}
