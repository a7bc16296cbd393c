use crate::domain::traits::{Candidate, SimilarityScorer};
use strsim::normalized_levenshtein;

pub const URL_WEIGHT: f64 = 0.5;
pub const TITLE_WEIGHT: f64 = 0.3;
pub const DOMAIN_WEIGHT: f64 = 0.2;

/// Weighted URL / title / domain similarity over pre-normalized URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScorer;

impl SimilarityScorer for WeightedScorer {
    fn score(&self, a: Candidate<'_>, b: Candidate<'_>) -> f64 {
        let (na, nb) = (a.url, b.url);

        let url = if na == nb {
            1.0
        } else {
            normalized_levenshtein(na.as_str(), nb.as_str())
        };
        let title = title_similarity(a.record.title(), b.record.title());
        let domain = match (na.host(), nb.host()) {
            (Some(ha), Some(hb)) if ha == hb => 1.0,
            _ => 0.0,
        };

        (URL_WEIGHT * url + TITLE_WEIGHT * title + DOMAIN_WEIGHT * domain).clamp(0.0, 1.0)
    }
}

/// Case-insensitive character-level ratio. Two blank titles are identical.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    match (a.is_empty(), b.is_empty()) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.0,
        _ => normalized_levenshtein(&a, &b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BookmarkRecord, NormalizedUrl};
    use crate::domain::traits::UrlNormalizer;
    use crate::infrastructure::url_normalizer::DefaultUrlNormalizer;

    fn rec(url: &str, title: &str) -> (BookmarkRecord, NormalizedUrl) {
        let r = BookmarkRecord::new(url, title, 0).unwrap();
        let n = DefaultUrlNormalizer.normalize(url);
        (r, n)
    }

    fn score(a: &(BookmarkRecord, NormalizedUrl), b: &(BookmarkRecord, NormalizedUrl)) -> f64 {
        WeightedScorer.score(
            Candidate {
                record: &a.0,
                url: &a.1,
            },
            Candidate {
                record: &b.0,
                url: &b.1,
            },
        )
    }

    #[test]
    fn title_similarity_edges() {
        assert_eq!(title_similarity("Test Title", "test title"), 1.0);
        assert_eq!(title_similarity("", "  "), 1.0);
        assert_eq!(title_similarity("test", ""), 0.0);

        let partial = title_similarity("GitHub Repository", "GitHub Project");
        assert!(partial > 0.0 && partial < 1.0);
    }

    #[test]
    fn identical_records_score_one() {
        let a = rec("https://www.example.com/?utm_source=x", "Example");
        let b = rec("https://example.com", "EXAMPLE");
        assert!((score(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn different_domains_lose_the_domain_weight() {
        let a = rec("https://site1.com/python", "Python");
        let b = rec("https://site2.com/python", "Python");
        let s = score(&a, &b);
        assert!(s < URL_WEIGHT + TITLE_WEIGHT + 1e-9);
        assert!(s > TITLE_WEIGHT);
    }

    #[test]
    fn malformed_urls_never_get_domain_credit() {
        let a = rec("not a url", "");
        let b = rec("not a url", "");
        // Raw text ratio is still 1.0; the domain weight is withheld.
        let s = score(&a, &b);
        assert!((s - (URL_WEIGHT + TITLE_WEIGHT)).abs() < 1e-9);
    }
}
