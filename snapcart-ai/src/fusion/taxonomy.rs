// Keyword Taxonomy
//
// Static reference data: named product types, each with a category and a list
// of synonym keywords. Built once at startup and shared read-only (`Arc`) by
// every pipeline invocation. The canonical name is itself a keyword.

use super::builtin_taxonomy::BUILTIN_ENTRIES;
use super::normalizer::case_fold;
use crate::types::ProductCategory;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Taxonomy loading error
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("Failed to read taxonomy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse taxonomy: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One product type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub canonical_name: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new(canonical_name: &str, category: ProductCategory, keywords: &[&str]) -> Self {
        Self {
            canonical_name: canonical_name.to_string(),
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Canonical name followed by the synonym keywords
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical_name.as_str()).chain(self.keywords.iter().map(String::as_str))
    }
}

/// On-disk layout: `[[entry]]` tables
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    #[serde(default, rename = "entry")]
    entries: Vec<TaxonomyEntry>,
}

/// A term with its pre-folded matching form
#[derive(Debug, Clone)]
pub(crate) struct FoldedTerm {
    pub text: String,
    pub folded: String,
}

/// Immutable taxonomy table
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
    /// Per entry: canonical name then keywords, folded once
    folded: Vec<Vec<FoldedTerm>>,
    /// Categories in first-declaration order
    categories: Vec<ProductCategory>,
}

static BUILTIN: Lazy<Arc<Taxonomy>> = Lazy::new(|| {
    let entries = BUILTIN_ENTRIES
        .iter()
        .map(|(name, category, keywords)| TaxonomyEntry::new(name, *category, keywords))
        .collect();
    Arc::new(Taxonomy::new(entries))
});

impl Taxonomy {
    /// Build a taxonomy, dropping malformed entries
    ///
    /// Entries with a blank canonical name are skipped; blank keywords are removed.
    pub fn new(entries: Vec<TaxonomyEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut folded = Vec::with_capacity(entries.len());
        let mut categories = Vec::new();

        for mut entry in entries {
            entry.canonical_name = entry.canonical_name.trim().to_string();
            if entry.canonical_name.is_empty() {
                warn!(
                    category = %entry.category,
                    "Skipping taxonomy entry with blank canonical name"
                );
                continue;
            }

            entry.keywords = entry
                .keywords
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();

            if !categories.contains(&entry.category) {
                categories.push(entry.category);
            }

            folded.push(
                entry
                    .terms()
                    .map(|t| FoldedTerm {
                        text: t.to_string(),
                        folded: case_fold(t),
                    })
                    .collect(),
            );
            kept.push(entry);
        }

        Self {
            entries: kept,
            folded,
            categories,
        }
    }

    /// Taxonomy with no entries (matcher passes raw terms through)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shared built-in table, constructed on first use
    pub fn builtin() -> Arc<Taxonomy> {
        Arc::clone(&BUILTIN)
    }

    /// Parse a TOML taxonomy document
    pub fn from_toml_str(content: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile = toml::from_str(content)?;
        Ok(Self::new(file.entries))
    }

    /// Load a TOML taxonomy file
    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let content = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the taxonomy for the service
    ///
    /// No path → built-in table. A path that cannot be loaded degrades to an
    /// empty taxonomy (terms pass through unexpanded, category is `Other`).
    pub fn load_or_degrade(path: Option<&Path>) -> Arc<Taxonomy> {
        let Some(path) = path else {
            let builtin = Self::builtin();
            info!(entries = builtin.len(), "Using built-in taxonomy");
            return builtin;
        };

        match Self::load(path) {
            Ok(taxonomy) => {
                if taxonomy.is_empty() {
                    warn!(path = %path.display(), "Taxonomy file has no usable entries");
                } else {
                    info!(path = %path.display(), entries = taxonomy.len(), "Loaded taxonomy");
                }
                Arc::new(taxonomy)
            }
            Err(e) => {
                warn!(error = %e, "Taxonomy unavailable; search terms will not be expanded");
                Arc::new(Self::empty())
            }
        }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// Categories in the order they are first declared
    pub fn categories(&self) -> &[ProductCategory] {
        &self.categories
    }

    pub(crate) fn folded_entries(&self) -> impl Iterator<Item = (&TaxonomyEntry, &[FoldedTerm])> {
        self.entries
            .iter()
            .zip(self.folded.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
