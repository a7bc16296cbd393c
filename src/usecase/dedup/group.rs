use crate::domain::config::DedupStrategy;
use crate::domain::graph::Graph;
use crate::domain::model::{BookmarkRecord, DuplicateGroup, NormalizedUrl};
use crate::domain::traits::{Candidate, ComponentDetector, SimilarityScorer, UrlNormalizer};
use std::collections::HashMap;

/// Ports the grouper needs.
pub struct GroupingContext<'a> {
    pub normalizer: &'a dyn UrlNormalizer,
    pub scorer: &'a dyn SimilarityScorer,
    pub components: &'a dyn ComponentDetector,
}

/// Partition `records` into duplicate groups. Only groups of two or more are returned,
/// ordered by the input position of their first member.
pub fn group_records(
    records: &[BookmarkRecord],
    strategy: DedupStrategy,
    threshold: f64,
    ctx: &GroupingContext<'_>,
) -> Vec<DuplicateGroup> {
    let normalized: Vec<NormalizedUrl> = records
        .iter()
        .map(|r| ctx.normalizer.normalize(r.url()))
        .collect();

    // (positions, fuzzy score)
    let buckets: Vec<(Vec<usize>, Option<f64>)> = match strategy {
        DedupStrategy::Url => bucket_by_key(
            normalized
                .iter()
                .enumerate()
                .filter_map(|(pos, n)| n.key().map(|k| (pos, k.to_string()))),
        )
        .into_iter()
        .map(|b| (b, None))
        .collect(),

        DedupStrategy::Title => bucket_by_key(
            records
                .iter()
                .enumerate()
                .filter_map(|(pos, r)| r.title_key().map(|k| (pos, k))),
        )
        .into_iter()
        .map(|b| (b, None))
        .collect(),

        DedupStrategy::Smart => partition_by_domain(&normalized)
            .into_iter()
            .flat_map(|partition| {
                bucket_by_key(partition.into_iter().filter_map(|pos| {
                    normalized[pos].key().map(|k| (pos, k.to_string()))
                }))
            })
            .map(|b| (b, None))
            .collect(),

        DedupStrategy::Fuzzy => partition_by_domain(&normalized)
            .into_iter()
            .flat_map(|partition| {
                fuzzy_components(records, &normalized, &partition, threshold, ctx)
            })
            .map(|(b, score)| (b, Some(score)))
            .collect(),
    };

    let mut groups: Vec<(usize, DuplicateGroup)> = buckets
        .into_iter()
        .filter(|(positions, _)| positions.len() > 1)
        .map(|(positions, score)| {
            let first_pos = positions.iter().copied().min().unwrap_or(usize::MAX);
            let mut members: Vec<usize> =
                positions.iter().map(|&p| records[p].source_index()).collect();
            members.sort_unstable();
            (
                first_pos,
                DuplicateGroup {
                    members,
                    strategy,
                    score,
                },
            )
        })
        .collect();

    groups.sort_by_key(|(first_pos, _)| *first_pos);
    groups.into_iter().map(|(_, g)| g).collect()
}

/// Buckets of positions sharing a key, in order of first appearance. Singletons included.
fn bucket_by_key(items: impl Iterator<Item = (usize, String)>) -> Vec<Vec<usize>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();

    for (pos, key) in items {
        match index.get(&key) {
            Some(&b) => buckets[b].push(pos),
            None => {
                index.insert(key, buckets.len());
                buckets.push(vec![pos]);
            }
        }
    }
    buckets
}

/// Positions grouped by host, in order of first appearance. Malformed URLs are left out.
fn partition_by_domain(normalized: &[NormalizedUrl]) -> Vec<Vec<usize>> {
    bucket_by_key(
        normalized
            .iter()
            .enumerate()
            .filter_map(|(pos, n)| n.host().map(|h| (pos, h.to_string()))),
    )
}

/// Connected components of the "scores at least `threshold`" relation inside one domain.
fn fuzzy_components(
    records: &[BookmarkRecord],
    normalized: &[NormalizedUrl],
    partition: &[usize],
    threshold: f64,
    ctx: &GroupingContext<'_>,
) -> Vec<(Vec<usize>, f64)> {
    if partition.len() < 2 {
        return Vec::new();
    }

    let candidates: Vec<Candidate<'_>> = partition
        .iter()
        .map(|&pos| Candidate {
            record: &records[pos],
            url: &normalized[pos],
        })
        .collect();

    let mut graph = Graph::new(partition.len());
    let mut weighted: Vec<(usize, usize, f64)> = Vec::new();

    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let s = ctx.scorer.score(candidates[i], candidates[j]);
            if s >= threshold {
                graph.add_edge(i, j);
                weighted.push((i, j, s));
            }
        }
    }

    if weighted.is_empty() {
        return Vec::new();
    }

    let result = ctx.components.connected_components(&graph);
    let mut weakest = vec![f64::INFINITY; result.components.len()];
    for &(i, _, s) in &weighted {
        let cid = result.component_of[i];
        weakest[cid] = weakest[cid].min(s);
    }

    result
        .components
        .into_iter()
        .enumerate()
        .filter(|(_, comp)| comp.len() > 1)
        .map(|(cid, comp)| {
            let positions = comp.into_iter().map(|local| partition[local]).collect();
            (positions, weakest[cid])
        })
        .collect()
}
