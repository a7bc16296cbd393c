use thiserror::Error;

/// Fatal configuration problems. Raised before any record is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown duplicate strategy: {0:?} (expected one of: url, title, smart, fuzzy)")]
    UnknownStrategy(String),

    #[error("unknown keep strategy: {0:?} (expected one of: first, last, shortest, longest)")]
    UnknownKeepStrategy(String),

    #[error("similarity threshold must be in (0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("max title length must be at least 4 characters, got {0}")]
    TitleLimitTooSmall(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("bookmark url must not be empty (source index {source_index})")]
    EmptyUrl { source_index: usize },
}

/// Why an exported link was refused at import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HrefError {
    #[error("empty link")]
    Empty,

    #[error("blocked scheme: {0}")]
    BlockedScheme(String),

    #[error("link has no host: {0:?}")]
    MissingHost(String),
}
