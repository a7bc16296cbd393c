use crate::domain::config::DedupStrategy;
use crate::domain::error::{HrefError, RecordError};
use std::fmt;

/// One saved link, as produced by the export parser. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkRecord {
    url: String,
    title: String,
    add_date: Option<String>,
    icon: Option<String>,
    folder_path: Vec<String>,
    source_index: usize,
}

impl BookmarkRecord {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        source_index: usize,
    ) -> Result<Self, RecordError> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(RecordError::EmptyUrl { source_index });
        }
        Ok(Self {
            url,
            title: title.into(),
            add_date: None,
            icon: None,
            folder_path: Vec::new(),
            source_index,
        })
    }

    pub fn with_add_date(self, add_date: Option<String>) -> Self {
        Self { add_date, ..self }
    }

    pub fn with_icon(self, icon: Option<String>) -> Self {
        Self { icon, ..self }
    }

    pub fn with_folder_path(self, folder_path: Vec<String>) -> Self {
        Self {
            folder_path,
            ..self
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_date(&self) -> Option<&str> {
        self.add_date.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn folder_path(&self) -> &[String] {
        &self.folder_path
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Key used by the title strategy; `None` for blank titles.
    pub fn title_key(&self) -> Option<String> {
        let key = self.title.trim().to_lowercase();
        (!key.is_empty()).then_some(key)
    }
}

/// Comparison-only form of a URL. Never written to output.
///
/// `Unparsed` carries the original text and compares unequal to everything,
/// itself included, so a parse failure can never merge two bookmarks.
#[derive(Debug, Clone)]
pub enum NormalizedUrl {
    Canonical { value: String, host: String },
    Unparsed(String),
}

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedUrl::Canonical { value, .. } => value,
            NormalizedUrl::Unparsed(raw) => raw,
        }
    }

    /// Canonical string, or `None` when the URL could not be parsed.
    pub fn key(&self) -> Option<&str> {
        match self {
            NormalizedUrl::Canonical { value, .. } => Some(value),
            NormalizedUrl::Unparsed(_) => None,
        }
    }

    /// Lower-cased host with `www.` removed.
    pub fn host(&self) -> Option<&str> {
        match self {
            NormalizedUrl::Canonical { host, .. } => Some(host),
            NormalizedUrl::Unparsed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, NormalizedUrl::Unparsed(_))
    }
}

impl PartialEq for NormalizedUrl {
    fn eq(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Records judged equivalent under one strategy. Members are source indices, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub members: Vec<usize>,
    pub strategy: DedupStrategy,
    /// Fuzzy only: weakest pairwise score among the edges that joined the group.
    pub score: Option<f64>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A group after keep resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOutcome {
    pub group: DuplicateGroup,
    pub kept: usize,
    pub removed: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CleanedLabel {
    pub domain: String,
    pub title: String,
}

impl CleanedLabel {
    pub fn new(domain: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for CleanedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.domain, self.title)
    }
}

/// An anchor the parser refused to turn into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLink {
    pub href: String,
    pub title: String,
    pub reason: HrefError,
}
