use crate::domain::error::ConfigError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_MAX_TITLE_CHARS: usize = 40;
/// Room for at least one character before the `...`.
pub const MIN_TITLE_CHARS: usize = 4;

static DEFAULT_MARKETING_PHRASES: Lazy<Vec<String>> = Lazy::new(|| {
    let raw = include_str!("../data/marketing_phrases.json");
    serde_json::from_str(raw).expect("Invalid marketing phrase list")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupStrategy {
    #[default]
    Url,
    Title,
    Smart,
    Fuzzy,
}

impl DedupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupStrategy::Url => "url",
            DedupStrategy::Title => "title",
            DedupStrategy::Smart => "smart",
            DedupStrategy::Fuzzy => "fuzzy",
        }
    }
}

impl FromStr for DedupStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(DedupStrategy::Url),
            "title" => Ok(DedupStrategy::Title),
            "smart" => Ok(DedupStrategy::Smart),
            "fuzzy" => Ok(DedupStrategy::Fuzzy),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepStrategy {
    #[default]
    First,
    Last,
    Shortest,
    Longest,
}

impl KeepStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeepStrategy::First => "first",
            KeepStrategy::Last => "last",
            KeepStrategy::Shortest => "shortest",
            KeepStrategy::Longest => "longest",
        }
    }
}

impl FromStr for KeepStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(KeepStrategy::First),
            "last" => Ok(KeepStrategy::Last),
            "shortest" => Ok(KeepStrategy::Shortest),
            "longest" => Ok(KeepStrategy::Longest),
            _ => Err(ConfigError::UnknownKeepStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for KeepStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the dedup engine needs, passed explicitly per run.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupConfig {
    pub strategy: DedupStrategy,
    pub keep_strategy: KeepStrategy,
    pub similarity_threshold: f64,
    pub generate_report: bool,
    pub marketing_phrases: Vec<String>,
    /// Cleaned titles longer than this are cut and end in `...`.
    pub max_title_chars: usize,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            strategy: DedupStrategy::default(),
            keep_strategy: KeepStrategy::default(),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            generate_report: false,
            marketing_phrases: DEFAULT_MARKETING_PHRASES.clone(),
            max_title_chars: DEFAULT_MAX_TITLE_CHARS,
        }
    }
}

impl DedupConfig {
    /// Build a config from the textual option names used by the CLI and config file.
    pub fn from_names(
        strategy: &str,
        keep_strategy: &str,
        similarity_threshold: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            strategy: strategy.parse()?,
            keep_strategy: keep_strategy.parse()?,
            similarity_threshold: similarity_threshold.unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.similarity_threshold;
        // NaN fails both comparisons.
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(t));
        }
        if self.max_title_chars < MIN_TITLE_CHARS {
            return Err(ConfigError::TitleLimitTooSmall(self.max_title_chars));
        }
        Ok(())
    }

    /// Overlay the optional values of a config file onto `self`.
    pub fn apply_file(&mut self, file: &ConfigFile) -> Result<(), ConfigError> {
        if let Some(s) = file.strategy.as_deref() {
            self.strategy = s.parse()?;
        }
        if let Some(k) = file.keep_strategy.as_deref() {
            self.keep_strategy = k.parse()?;
        }
        if let Some(t) = file.similarity_threshold {
            self.similarity_threshold = t;
        }
        if let Some(g) = file.generate_report {
            self.generate_report = g;
        }
        if let Some(phrases) = file.marketing_phrases.as_ref() {
            self.marketing_phrases = phrases.clone();
        }
        if let Some(n) = file.max_title_chars {
            self.max_title_chars = n;
        }
        self.validate()
    }
}

/// On-disk JSON configuration. Every field is optional; names are validated on apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub keep_strategy: Option<String>,
    #[serde(default)]
    pub similarity_threshold: Option<f64>,
    #[serde(default)]
    pub generate_report: Option<bool>,
    #[serde(default)]
    pub marketing_phrases: Option<Vec<String>>,
    #[serde(default)]
    pub max_title_chars: Option<usize>,
}
