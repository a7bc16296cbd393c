use crate::domain::config::{DedupConfig, DEFAULT_MAX_TITLE_CHARS};
use crate::domain::model::{BookmarkRecord, CleanedLabel};
use crate::infrastructure::url_normalizer::extract_domain;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use url::Url;

pub const UNKNOWN_DOMAIN: &str = "unknown";

static SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|\s*|\s+[-–—·»]\s+|:\s+").expect("valid separator regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static TRAILING_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\.\.\.|…|[.,;:])+$").expect("valid punctuation regex"));

/// Path segments that say nothing about the page.
const IGNORED_SEGMENTS: &[&str] = &[
    "en", "us", "en-us", "en_us", "home", "index", "index.html", "index.htm", "index.php", "main",
];
const PAGE_EXTENSIONS: &[&str] = &[".html", ".htm", ".php", ".aspx"];
const ELLIPSIS: &str = "...";

/// Strips boilerplate from raw titles using a phrase list supplied as configuration.
#[derive(Debug, Clone)]
pub struct TitleCleaner {
    phrases: Vec<String>,
    max_chars: usize,
}

impl TitleCleaner {
    pub fn new(phrases: &[String]) -> Self {
        let mut phrases: Vec<String> = phrases
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        // Longest first so "official site" wins over "official".
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();
        Self {
            phrases,
            max_chars: DEFAULT_MAX_TITLE_CHARS,
        }
    }

    pub fn from_config(config: &DedupConfig) -> Self {
        Self::new(&config.marketing_phrases).with_max_chars(config.max_title_chars)
    }

    /// Longer titles are cut to `max_chars` characters, `...` included.
    pub fn with_max_chars(self, max_chars: usize) -> Self {
        Self { max_chars, ..self }
    }

    /// Fluff-stripped title; may be empty.
    pub fn clean(&self, raw: &str) -> String {
        let collapsed = collapse_whitespace(raw);
        let without_prefix = self.strip_leading_phrases(&collapsed);
        let without_taglines = self.drop_taglines(&without_prefix);
        let trimmed = TRAILING_PUNCT.replace(without_taglines.trim_end(), "");
        self.truncate(collapse_whitespace(&trimmed))
    }

    /// `clean`, falling back to the raw title and then to `domain`.
    pub fn clean_or_fallback(&self, raw: &str, domain: &str) -> String {
        let cleaned = self.clean(raw);
        if !cleaned.is_empty() {
            return cleaned;
        }
        let raw = collapse_whitespace(raw);
        if !raw.is_empty() {
            return self.truncate(raw);
        }
        domain.to_string()
    }

    fn truncate(&self, text: String) -> String {
        if text.chars().count() <= self.max_chars {
            return text;
        }
        let keep = self.max_chars.saturating_sub(ELLIPSIS.len());
        let head: String = text.chars().take(keep).collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    }

    fn strip_leading_phrases(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let Some(rest) = self
                .phrases
                .iter()
                .find_map(|p| strip_prefix_ignore_case(&current, p))
            else {
                return current;
            };
            let rest = rest.trim_start_matches(|c: char| {
                c.is_whitespace() || matches!(c, ':' | '-' | '|' | ',' | '–' | '—')
            });
            if rest.len() == current.len() {
                return current;
            }
            current = rest.to_string();
        }
    }

    fn drop_taglines(&self, text: &str) -> String {
        let mut current = text.to_string();

        // A leading slogan ("Official Site | Acme") gives way to what follows it.
        loop {
            let Some(first_sep) = SEPARATOR.find(&current) else {
                return current;
            };
            if !self.is_slogan(&current[..first_sep.start()]) {
                break;
            }
            current = current[first_sep.end()..].to_string();
        }

        let seps: Vec<(usize, usize)> = SEPARATOR
            .find_iter(&current)
            .map(|m| (m.start(), m.end()))
            .collect();
        for (i, &(sep_start, sep_end)) in seps.iter().enumerate() {
            let seg_end = seps.get(i + 1).map_or(current.len(), |&(s, _)| s);
            if self.is_slogan(&current[sep_end..seg_end]) {
                return current[..sep_start].to_string();
            }
        }
        current
    }

    fn is_slogan(&self, segment: &str) -> bool {
        let segment = segment.trim();
        if segment.is_empty() {
            return true;
        }
        let lower = segment.to_lowercase();
        if self.phrases.iter().any(|p| contains_word_phrase(&lower, p)) {
            return true;
        }
        let words: Vec<&str> = segment.split_whitespace().collect();
        let lowercase_words = words
            .iter()
            .filter(|w| w.chars().next().is_some_and(|c| c.is_lowercase()))
            .count();
        words.len() >= 3 && lowercase_words * 2 > words.len()
    }
}

/// Domain -> labels already handed out in this run.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    used: HashMap<String, HashSet<String>>,
}

impl LabelRegistry {
    pub fn is_used(&self, label: &CleanedLabel) -> bool {
        self.used
            .get(&label.domain)
            .is_some_and(|set| set.contains(&label.to_string()))
    }

    pub fn insert(&mut self, label: &CleanedLabel) {
        self.used
            .entry(label.domain.clone())
            .or_default()
            .insert(label.to_string());
    }

    pub fn len(&self) -> usize {
        self.used.values().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Produces unique `domain | title` labels.
#[derive(Debug, Clone)]
pub struct LabelCleaner {
    titles: TitleCleaner,
}

impl LabelCleaner {
    pub fn new(titles: TitleCleaner) -> Self {
        Self { titles }
    }

    pub fn titles(&self) -> &TitleCleaner {
        &self.titles
    }

    /// Label for `record`, unique within `registry`; the label is recorded there.
    pub fn clean(&self, record: &BookmarkRecord, registry: &mut LabelRegistry) -> CleanedLabel {
        let domain = label_domain(record.url());
        let title = self.titles.clean_or_fallback(record.title(), &domain);
        let mut label = CleanedLabel::new(domain, title);

        if registry.is_used(&label) {
            if let Some(q) = path_qualifier(record.url()) {
                label.title = format!("{} ({q})", label.title);
            }
        }
        if registry.is_used(&label) {
            label.title = format!("{} #{}", label.title, record.source_index());
        }
        let base = label.title.clone();
        let mut n = 2;
        while registry.is_used(&label) {
            label.title = format!("{base}-{n}");
            n += 1;
        }

        registry.insert(&label);
        label
    }
}

/// Host used in labels; `unknown` when the URL has none.
pub fn label_domain(url: &str) -> String {
    extract_domain(url).unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, phrase: &str) -> Option<&'a str> {
    let head = text.get(..phrase.len())?;
    if head.to_lowercase() != phrase {
        return None;
    }
    let rest = &text[phrase.len()..];
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() => None,
        _ => Some(rest),
    }
}

fn contains_word_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(i, _)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + phrase.len()..].chars().next();
        !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
    })
}

/// Title-cased first meaningful path segment; `Homepage` for a bare path.
pub fn path_qualifier(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let segments = parsed.path_segments()?;

    for seg in segments {
        let lower = seg.to_lowercase();
        if seg.is_empty() || IGNORED_SEGMENTS.contains(&lower.as_str()) {
            continue;
        }
        let stem = PAGE_EXTENSIONS
            .iter()
            .find_map(|ext| lower.strip_suffix(ext).and_then(|s| seg.get(..s.len())))
            .unwrap_or(seg);
        let words = title_case(&stem.replace(['-', '_', '+'], " "));
        if !words.is_empty() {
            return Some(words);
        }
    }
    Some("Homepage".to_string())
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
