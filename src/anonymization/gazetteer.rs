//! Gazetteer store
//!
//! Loads curated place-name lists from line-delimited files. Each line is one
//! canonical name; surrounding whitespace is trimmed and blank lines are
//! dropped. Source order is preserved and duplicates are kept.
//!
//! A missing file is a degraded state rather than an error: the gazetteer is
//! empty, marked [`Availability::Missing`], and detectors built from it simply
//! match nothing.

use crate::anonymization::config::GazetteersConfig;
use crate::domain::{RedactaError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Whether a gazetteer's source could be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Source was read (it may still contain zero names)
    Loaded,
    /// Source file does not exist
    Missing,
}

/// Ordered, read-only list of canonical names
#[derive(Debug, Clone)]
pub struct Gazetteer {
    name: String,
    source: Option<PathBuf>,
    names: Vec<String>,
    availability: Availability,
}

impl Gazetteer {
    /// Load a gazetteer from a line-delimited file
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read (permissions,
    /// invalid UTF-8). A missing file yields an empty, `Missing` gazetteer.
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let name = name.into();
        let path = path.as_ref();

        let (names, availability) = read_names(&name, path)?;

        Ok(Self {
            name,
            source: Some(path.to_path_buf()),
            names,
            availability,
        })
    }

    /// Build an in-memory gazetteer, applying the same trimming rules as [`load`](Self::load)
    pub fn from_names<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            source: None,
            names: names
                .into_iter()
                .filter_map(|line| clean_line(line.as_ref()))
                .collect(),
            availability: Availability::Loaded,
        }
    }

    /// Re-read the source and replace the list wholesale
    ///
    /// In-memory gazetteers are left untouched.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = self.source.clone() {
            let (names, availability) = read_names(&self.name, &path)?;
            self.names = names;
            self.availability = availability;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Names in source order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Loaded
    }

    /// Human-readable listing, `"; "`-joined in source order
    pub fn joined(&self) -> String {
        if self.names.is_empty() {
            "(none loaded)".to_string()
        } else {
            self.names.join("; ")
        }
    }
}

fn clean_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn read_names(name: &str, path: &Path) -> Result<(Vec<String>, Availability)> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let names: Vec<String> = contents.lines().filter_map(clean_line).collect();
            tracing::debug!(
                gazetteer = name,
                path = %path.display(),
                entries = names.len(),
                "Gazetteer loaded"
            );
            Ok((names, Availability::Loaded))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            crate::log_gazetteer_degraded!(name, path.display());
            Ok((Vec::new(), Availability::Missing))
        }
        Err(e) => Err(RedactaError::Gazetteer(format!(
            "Failed to read gazetteer '{}' from {}: {}",
            name,
            path.display(),
            e
        ))),
    }
}

/// The district and commune gazetteers
#[derive(Debug, Clone)]
pub struct GazetteerSet {
    pub district: Gazetteer,
    pub commune: Gazetteer,
}

impl GazetteerSet {
    /// Load both gazetteers from their configured sources
    pub fn load(config: &GazetteersConfig) -> Result<Self> {
        Ok(Self {
            district: Gazetteer::load("district", &config.district.path)?,
            commune: Gazetteer::load("commune", &config.commune.path)?,
        })
    }

    /// Reload both lists from their sources
    pub fn reload(&mut self) -> Result<()> {
        self.district.reload()?;
        self.commune.reload()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gazetteer> {
        [&self.district, &self.commune].into_iter()
    }

    /// Gazetteers whose source was missing
    pub fn missing(&self) -> Vec<&Gazetteer> {
        self.iter().filter(|g| !g.is_available()).collect()
    }

    /// One warning per missing source, suitable for showing to a user
    pub fn warnings(&self) -> Vec<String> {
        self.missing()
            .into_iter()
            .map(|g| {
                let source = g
                    .source()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(in-memory)".to_string());
                format!(
                    "Gazetteer '{}' not found at {}; no {} matches will be produced",
                    g.name(),
                    source,
                    g.name()
                )
            })
            .collect()
    }
}
