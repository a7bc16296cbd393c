use crate::domain::graph::{ComponentResult, Graph};
use crate::domain::model::{BookmarkRecord, NormalizedUrl};

pub trait UrlNormalizer {
    fn normalize(&self, url: &str) -> NormalizedUrl;
}

pub trait ComponentDetector {
    fn connected_components(&self, graph: &Graph) -> ComponentResult;
}

/// A record paired with its already-normalized URL.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub record: &'a BookmarkRecord,
    pub url: &'a NormalizedUrl,
}

pub trait SimilarityScorer {
    /// Similarity in `[0, 1]`.
    fn score(&self, a: Candidate<'_>, b: Candidate<'_>) -> f64;
}
