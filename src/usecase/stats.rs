use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub total_input: usize,
    pub survivors: usize,
    pub total_removed: usize,
    pub group_count: usize,
    pub malformed_urls: usize,
}
