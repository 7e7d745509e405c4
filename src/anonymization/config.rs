//! Anonymization configuration

use crate::anonymization::models::{EntityCategory, DENY_LIST_SCORE};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ordered set of categories detectors are allowed to emit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryWhitelist(Vec<EntityCategory>);

impl CategoryWhitelist {
    /// Build a whitelist, dropping repeated entries but keeping first-seen order
    pub fn new(categories: impl IntoIterator<Item = EntityCategory>) -> Self {
        let mut ordered = Vec::new();
        for category in categories {
            if !ordered.contains(&category) {
                ordered.push(category);
            }
        }
        Self(ordered)
    }

    /// Parse a comma-separated label list such as `PERSON,LOCATION`
    pub fn parse_list(list: &str) -> Result<Self> {
        let categories = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<EntityCategory>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(categories))
    }

    pub fn contains(&self, category: EntityCategory) -> bool {
        self.0.contains(&category)
    }

    pub fn categories(&self) -> &[EntityCategory] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryWhitelist {
    fn default() -> Self {
        Self::new(EntityCategory::ALL)
    }
}

/// Offset unit used by an external recognizer's results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffsetUnit {
    /// UTF-8 byte offsets
    Bytes,
    /// Unicode scalar value (code point) offsets, as analyzer services emit them
    #[default]
    Chars,
}

/// Anonymization pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Categories detectors may emit
    #[serde(default)]
    pub categories: CategoryWhitelist,

    /// Dry-run mode (detect and resolve but don't rewrite)
    #[serde(default)]
    pub dry_run: bool,

    /// Run detector adapters on scoped threads
    #[serde(default)]
    pub parallel_detectors: bool,

    /// Path to pattern library TOML file (built-in library when unset)
    pub pattern_library: Option<PathBuf>,

    /// Regex patterns below this confidence are skipped
    #[serde(default = "default_regex_confidence_threshold")]
    pub regex_confidence_threshold: f32,

    /// Gazetteer sources
    #[serde(default)]
    pub gazetteers: GazetteersConfig,

    /// Statistical recognizer result handling
    #[serde(default)]
    pub ner: NerConfig,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_regex_confidence_threshold() -> f32 {
    0.5
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            categories: CategoryWhitelist::default(),
            dry_run: false,
            parallel_detectors: false,
            pattern_library: None,
            regex_confidence_threshold: default_regex_confidence_threshold(),
            gazetteers: GazetteersConfig::default(),
            ner: NerConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            anyhow::bail!("anonymization.categories must list at least one category");
        }

        if !(0.0..=1.0).contains(&self.regex_confidence_threshold) {
            anyhow::bail!(
                "anonymization.regex_confidence_threshold must be within [0, 1], got {}",
                self.regex_confidence_threshold
            );
        }

        // Validate pattern library path if specified
        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                anyhow::bail!("Pattern library file not found: {}", path.display());
            }
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                anyhow::bail!("Pattern library must be a TOML file: {}", path.display());
            }
        }

        self.gazetteers
            .district
            .validate()
            .context("Invalid gazetteers.district configuration")?;
        self.gazetteers
            .commune
            .validate()
            .context("Invalid gazetteers.commune configuration")?;

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_CATEGORIES") {
            self.categories = CategoryWhitelist::parse_list(&val)
                .context("Invalid REDACTA_ANONYMIZATION_CATEGORIES value")?;
        }

        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_DRY_RUN") {
            self.dry_run = val
                .parse()
                .context("Invalid REDACTA_ANONYMIZATION_DRY_RUN value")?;
        }

        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_PARALLEL_DETECTORS") {
            self.parallel_detectors = val
                .parse()
                .context("Invalid REDACTA_ANONYMIZATION_PARALLEL_DETECTORS value")?;
        }

        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_PATTERN_LIBRARY") {
            self.pattern_library = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("REDACTA_GAZETTEER_DISTRICT_PATH") {
            self.gazetteers.district.path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("REDACTA_GAZETTEER_COMMUNE_PATH") {
            self.gazetteers.commune.path = PathBuf::from(val);
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// The two gazetteer sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteersConfig {
    #[serde(default = "default_district_source")]
    pub district: GazetteerSourceConfig,

    #[serde(default = "default_commune_source")]
    pub commune: GazetteerSourceConfig,
}

fn default_district_source() -> GazetteerSourceConfig {
    GazetteerSourceConfig::at("data/district.txt")
}

fn default_commune_source() -> GazetteerSourceConfig {
    GazetteerSourceConfig::at("data/commune.txt")
}

impl Default for GazetteersConfig {
    fn default() -> Self {
        Self {
            district: default_district_source(),
            commune: default_commune_source(),
        }
    }
}

/// One line-delimited gazetteer file and how its matches are labelled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GazetteerSourceConfig {
    /// File path, one name per line
    pub path: PathBuf,

    /// Category emitted for matches
    #[serde(default = "default_gazetteer_category")]
    pub category: EntityCategory,

    /// Match case-sensitively (ASCII case folding otherwise)
    #[serde(default)]
    pub case_sensitive: bool,

    /// Score assigned to every match
    #[serde(default = "default_gazetteer_score")]
    pub score: f32,
}

fn default_gazetteer_category() -> EntityCategory {
    EntityCategory::Location
}

fn default_gazetteer_score() -> f32 {
    DENY_LIST_SCORE
}

impl GazetteerSourceConfig {
    /// Source at `path` with default matching options
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            category: default_gazetteer_category(),
            case_sensitive: false,
            score: default_gazetteer_score(),
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.score) {
            anyhow::bail!("score must be within [0, 1], got {}", self.score);
        }
        if self.path.as_os_str().is_empty() {
            anyhow::bail!("path must not be empty");
        }
        Ok(())
    }
}

/// Statistical recognizer settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NerConfig {
    /// Offset unit used in recognizer result files
    #[serde(default)]
    pub offset_unit: OffsetUnit,
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_enabled() -> bool {
    false
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path must not be empty when audit logging is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid REDACTA_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("REDACTA_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid REDACTA_ANONYMIZATION_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}
