use std::collections::HashSet;

use bookmark_cleaner::domain::config::{DedupConfig, DedupStrategy, KeepStrategy};
use bookmark_cleaner::domain::model::BookmarkRecord;
use bookmark_cleaner::domain::traits::{Candidate, SimilarityScorer};
use bookmark_cleaner::infrastructure::union_find::UnionFindComponentDetector;
use bookmark_cleaner::infrastructure::url_normalizer::DefaultUrlNormalizer;
use bookmark_cleaner::usecase::dedup::group::{group_records, GroupingContext};
use bookmark_cleaner::usecase::dedup::{dedupe, DedupResult};

fn rec(url: &str, title: &str, idx: usize) -> BookmarkRecord {
    BookmarkRecord::new(url, title, idx).expect("record")
}

fn config(strategy: DedupStrategy, keep: KeepStrategy) -> DedupConfig {
    DedupConfig {
        strategy,
        keep_strategy: keep,
        ..DedupConfig::default()
    }
}

fn run(records: &[BookmarkRecord], config: &DedupConfig) -> DedupResult {
    dedupe(
        records,
        config,
        &DefaultUrlNormalizer,
        &UnionFindComponentDetector,
    )
    .expect("dedupe")
}

fn mixed_export() -> Vec<BookmarkRecord> {
    vec![
        rec("https://example.com", "Example Site - Welcome", 0),
        rec("https://github.com/en/", "GitHub Docs", 1),
        rec("https://www.example.com/?utm_source=x", "Example Site", 2),
        rec("https://github.com/quisquous/cactbot", "GitHub - quisquous/cactbot", 3),
        rec("http://example.com/", "Example", 4),
        rec("https://docs.rs/serde", "serde - Rust", 5),
        rec("https://docs.rs/serde/", "serde - Rust", 6),
        rec("::broken::", "Broken", 7),
        rec("https://docs.rs/tokio", "tokio - Rust", 8),
    ]
}

const ALL_STRATEGIES: [DedupStrategy; 4] = [
    DedupStrategy::Url,
    DedupStrategy::Title,
    DedupStrategy::Smart,
    DedupStrategy::Fuzzy,
];

#[test]
fn survivors_plus_removed_account_for_every_input() {
    let records = mixed_export();
    for strategy in ALL_STRATEGIES {
        let res = run(&records, &config(strategy, KeepStrategy::First));
        let removed: usize = res.groups.iter().map(|g| g.group.len() - 1).sum();
        assert_eq!(
            res.survivors.len() + removed,
            records.len(),
            "strategy {strategy}"
        );

        let mut seen: HashSet<usize> = res.survivors.iter().map(|r| r.source_index()).collect();
        for g in &res.groups {
            for &r in &g.removed {
                assert!(seen.insert(r), "index {r} seen twice under {strategy}");
            }
        }
        assert_eq!(seen.len(), records.len());
    }
}

#[test]
fn dedupe_is_idempotent() {
    let records = mixed_export();
    for strategy in ALL_STRATEGIES {
        let cfg = config(strategy, KeepStrategy::First);
        let once = run(&records, &cfg);
        let twice = run(&once.survivors, &cfg);
        assert_eq!(twice.stats.total_removed, 0, "strategy {strategy}");
        assert_eq!(twice.survivors, once.survivors);
    }
}

#[test]
fn survivor_labels_are_unique_and_domain_prefixed() {
    let records = mixed_export();
    for strategy in ALL_STRATEGIES {
        let res = run(&records, &config(strategy, KeepStrategy::First));
        let labels: Vec<String> = res.labels.iter().map(|l| l.to_string()).collect();
        let distinct: HashSet<&String> = labels.iter().collect();
        assert_eq!(distinct.len(), labels.len(), "labels {labels:?}");
        assert!(labels.iter().all(|l| l.contains(" | ")));
    }
}

#[test]
fn first_and_last_keep_extreme_indices() {
    let records = vec![
        rec("https://a.com/x", "A", 0),
        rec("https://a.com/x/", "A", 1),
        rec("https://www.a.com/x", "A", 2),
    ];

    let res = run(&records, &config(DedupStrategy::Url, KeepStrategy::First));
    assert_eq!(res.groups[0].kept, 0);
    assert_eq!(res.groups[0].removed, vec![1, 2]);

    let res = run(&records, &config(DedupStrategy::Url, KeepStrategy::Last));
    assert_eq!(res.groups[0].kept, 2);
    assert_eq!(res.survivors[0].source_index(), 2);
}

#[test]
fn url_strategy_merges_scheme_and_www_variants() {
    let records = vec![rec("http://x.com", "X", 0), rec("https://www.x.com/", "X", 1)];

    let res = run(&records, &config(DedupStrategy::Url, KeepStrategy::First));

    assert_eq!(res.groups.len(), 1);
    assert_eq!(res.groups[0].group.members, vec![0, 1]);
    assert_eq!(res.groups[0].kept, 0);
    assert_eq!(res.survivors.len(), 1);
}

#[test]
fn smart_strategy_keeps_distinct_pages_on_one_domain() {
    let records = vec![
        rec("https://github.com/en/", "GitHub", 0),
        rec("https://github.com/quisquous/cactbot", "GitHub", 1),
    ];

    let res = run(&records, &config(DedupStrategy::Smart, KeepStrategy::First));

    assert!(res.groups.is_empty());
    assert_eq!(res.survivors.len(), 2);
    assert_ne!(res.labels[0], res.labels[1]);
}

#[test]
fn title_strategy_ignores_blank_titles() {
    let records = vec![
        rec("https://a.com", "", 0),
        rec("https://b.com", "  ", 1),
        rec("https://c.com", "Same", 2),
        rec("https://d.com", " same ", 3),
    ];

    let res = run(&records, &config(DedupStrategy::Title, KeepStrategy::First));

    assert_eq!(res.groups.len(), 1);
    assert_eq!(res.groups[0].group.members, vec![2, 3]);
}

struct TableScorer;

impl SimilarityScorer for TableScorer {
    fn score(&self, a: Candidate<'_>, b: Candidate<'_>) -> f64 {
        let mut pair = [a.record.title(), b.record.title()];
        pair.sort_unstable();
        match pair {
            ["A", "B"] | ["B", "C"] => 0.9,
            ["C", "D"] => 0.85,
            _ => 0.3,
        }
    }
}

#[test]
fn fuzzy_groups_are_transitively_connected() {
    let records = vec![
        rec("https://site.com/a", "A", 0),
        rec("https://site.com/b", "B", 1),
        rec("https://site.com/c", "C", 2),
    ];
    let normalizer = DefaultUrlNormalizer;
    let components = UnionFindComponentDetector;
    let ctx = GroupingContext {
        normalizer: &normalizer,
        scorer: &TableScorer,
        components: &components,
    };

    let groups = group_records(&records, DedupStrategy::Fuzzy, 0.85, &ctx);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members, vec![0, 1, 2]);
    assert_eq!(groups[0].score, Some(0.9));
}

#[test]
fn fuzzy_edge_at_exactly_the_threshold_counts() {
    let records = vec![
        rec("https://site.com/c", "C", 0),
        rec("https://site.com/d", "D", 1),
    ];
    let normalizer = DefaultUrlNormalizer;
    let components = UnionFindComponentDetector;
    let ctx = GroupingContext {
        normalizer: &normalizer,
        scorer: &TableScorer,
        components: &components,
    };

    let groups = group_records(&records, DedupStrategy::Fuzzy, 0.85, &ctx);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].score, Some(0.85));

    assert!(group_records(&records, DedupStrategy::Fuzzy, 0.86, &ctx).is_empty());
}

#[test]
fn fuzzy_never_crosses_domains() {
    let records = vec![
        rec("https://a.com/docs", "Documentation", 0),
        rec("https://b.com/docs", "Documentation", 1),
    ];
    let cfg = DedupConfig {
        similarity_threshold: 0.1,
        ..config(DedupStrategy::Fuzzy, KeepStrategy::First)
    };

    let res = run(&records, &cfg);

    assert!(res.groups.is_empty());
}

#[test]
fn malformed_urls_survive_and_are_reported() {
    let records = vec![
        rec("::broken::", "Broken", 0),
        rec("::broken::", "Broken", 1),
        rec("https://a.com", "A", 2),
    ];

    let res = run(&records, &config(DedupStrategy::Url, KeepStrategy::First));

    assert_eq!(res.survivors.len(), 3);
    assert_eq!(res.malformed, vec![0, 1]);
    assert_eq!(res.stats.malformed_urls, 2);
}
