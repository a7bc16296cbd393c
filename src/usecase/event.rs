use crate::usecase::stats::DedupStats;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    PhaseStarted {
        name: String,
    },
    PhaseFinished {
        name: String,
    },

    RecordsParsed {
        count: usize,
    },

    LinkRejected {
        href: String,
        title: String,
        reason: String,
    },

    MalformedUrl {
        source_index: usize,
        url: String,
    },

    DuplicatesGrouped {
        strategy: String,
        groups: usize,
    },

    DuplicateRemoved {
        kept_url: String,
        removed_urls: Vec<String>,
        score: Option<f64>,
    },

    LabelsAssigned {
        count: usize,
    },

    Finished {
        stats: DedupStats,
    },
}
