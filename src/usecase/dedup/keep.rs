use crate::domain::config::KeepStrategy;
use crate::domain::model::DuplicateGroup;
use std::cmp::Reverse;

/// Pick the survivor of `group`. `title_len` returns the cleaned title length of a member.
///
/// Ties on title length go to the lowest source index.
pub fn resolve_keep(
    group: &DuplicateGroup,
    strategy: KeepStrategy,
    title_len: impl Fn(usize) -> usize,
) -> Option<usize> {
    let members = group.members.iter().copied();
    match strategy {
        KeepStrategy::First => members.min(),
        KeepStrategy::Last => members.max(),
        KeepStrategy::Shortest => members.min_by_key(|&idx| (title_len(idx), idx)),
        KeepStrategy::Longest => members.min_by_key(|&idx| (Reverse(title_len(idx)), idx)),
    }
}
