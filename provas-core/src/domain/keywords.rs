//! Keyword catalogs for subject-area and topic classification

use crate::domain::error::DomainError;
use crate::domain::tables;
use serde::{Deserialize, Serialize};

/// Named list of keywords
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Subject-area and topic keyword sets
///
/// Order matters: subject areas are listed in tie-break priority order and
/// topics are reported in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCatalog {
    #[serde(default)]
    pub subject_areas: Vec<KeywordSet>,
    #[serde(default)]
    pub topics: Vec<KeywordSet>,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self {
            subject_areas: tables::SUBJECT_AREAS
                .iter()
                .map(|(name, keywords)| KeywordSet::new(*name, keywords))
                .collect(),
            topics: tables::TOPICS
                .iter()
                .map(|(name, keywords)| KeywordSet::new(*name, keywords))
                .collect(),
        }
    }
}

impl KeywordCatalog {
    /// Catalog with no keyword sets at all
    pub fn empty() -> Self {
        Self {
            subject_areas: Vec::new(),
            topics: Vec::new(),
        }
    }

    /// Parse a catalog from TOML
    ///
    /// ```toml
    /// [[subject_areas]]
    /// name = "Matemática"
    /// keywords = ["equação", "função"]
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let catalog: KeywordCatalog = toml::from_str(content)
            .map_err(|e| DomainError::KeywordTable(format!("Failed to parse keyword table: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize the catalog to TOML
    pub fn to_toml_string(&self) -> Result<String, DomainError> {
        toml::to_string(self).map_err(|e| {
            DomainError::KeywordTable(format!("Failed to serialize keyword table: {e}"))
        })
    }

    /// Merge another catalog into this one
    ///
    /// Sets with an existing name gain the new keywords; unknown sets are
    /// appended after the existing ones, so built-in priority is preserved.
    pub fn extend(&mut self, other: KeywordCatalog) {
        merge_sets(&mut self.subject_areas, other.subject_areas);
        merge_sets(&mut self.topics, other.topics);
    }

    /// Subject area names in priority order
    pub fn area_names(&self) -> impl Iterator<Item = &str> {
        self.subject_areas.iter().map(|set| set.name.as_str())
    }

    /// Rejects sets with an empty name or an empty keyword
    pub fn validate(&self) -> Result<(), DomainError> {
        for set in self.subject_areas.iter().chain(&self.topics) {
            if set.name.trim().is_empty() {
                return Err(DomainError::KeywordTable(
                    "keyword set name must not be empty".to_string(),
                ));
            }
            if set.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(DomainError::KeywordTable(format!(
                    "keyword set '{}' contains an empty keyword",
                    set.name
                )));
            }
        }
        Ok(())
    }
}

fn merge_sets(target: &mut Vec<KeywordSet>, incoming: Vec<KeywordSet>) {
    for set in incoming {
        match target.iter_mut().find(|existing| existing.name == set.name) {
            Some(existing) => {
                for keyword in set.keywords {
                    if !existing.keywords.contains(&keyword) {
                        existing.keywords.push(keyword);
                    }
                }
            }
            None => target.push(set),
        }
    }
}
