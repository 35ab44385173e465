//! Keyword catalogs driving every field extractor.
//!
//! A [`Catalog`] is an immutable value handed to the pipeline. Term order is
//! significant: equipment and brand matching is first-match-wins in catalog
//! order, and facility matching tries terms in order as well.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Result, ScoutError};

/// File name looked up under the user configuration directory.
pub const CATALOG_FILE_NAME: &str = "catalog.json";

/// Synonym terms for one modality code (e.g. `CT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityEntry {
    pub code: String,
    pub terms: Vec<String>,
}

/// Static reference data for equipment types, brands, facility kinds and modalities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Free-form version tag, reported alongside each run.
    pub version: String,
    pub equipment_terms: Vec<String>,
    pub brand_terms: Vec<String>,
    pub facility_terms: Vec<String>,
    /// Ordered modality table; the first code with a matching synonym wins.
    pub modality_map: Vec<ModalityEntry>,
}

fn strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

fn modality(code: &str, terms: &[&str]) -> ModalityEntry {
    ModalityEntry { code: code.to_string(), terms: strings(terms) }
}

impl Default for Catalog {
    /// Built-in catalog for the Argentine market (Spanish-language sources).
    fn default() -> Self {
        Self {
            version: "ar-2".to_string(),
            equipment_terms: strings(&[
                "resonador",
                "resonancia",
                "tomógrafo",
                "tomografía",
                "rayos X",
                "angiógrafo",
                "angiografo",
                "angiografía",
                "mamógrafo",
                "mamografía",
                "ecógrafo",
                "ecografía",
            ]),
            brand_terms: strings(&[
                "Philips", "Siemens", "GE", "Toshiba", "Canon", "Hitachi", "Fujifilm", "Samsung", "Mindray", "Esaote",
                "Carestream", "Agfa",
            ]),
            facility_terms: strings(&[
                "Hospital",
                "Clínica",
                "Sanatorio",
                "Fundación",
                "Instituto",
                "Centro de Salud",
                "Centro Médico",
                "Maternidad",
            ]),
            modality_map: vec![
                modality("MR", &["resonador", "resonancia"]),
                modality("CT", &["tomógrafo", "tomografía"]),
                modality("DXR", &["rayos x", "radiografía digital", "radiología digital"]),
                modality("IGT", &["angiógrafo", "angiografo", "angiografía", "hemodinamia"]),
                modality("US", &["ecógrafo", "ecografía", "ultrasonido"]),
                modality("MG", &["mamógrafo", "mamografía"]),
            ],
        }
    }
}

impl Catalog {
    /// Loads a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ScoutError::ConfigError(format!("cannot read catalog {}: {}", path.display(), e)))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .map_err(|e| ScoutError::ConfigError(format!("invalid catalog {}: {}", path.display(), e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Path of the user-level catalog override, if a config directory exists.
    pub fn user_catalog_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("medscout").join(CATALOG_FILE_NAME))
    }

    /// Loads the user-level catalog when present, otherwise the built-in one.
    pub fn discover() -> Result<Self> {
        match Self::user_catalog_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading user catalog");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Rejects catalogs that could never produce a record.
    pub fn validate(&self) -> Result<()> {
        if self.equipment_terms.is_empty() {
            return Err(ScoutError::ConfigError("catalog has no equipment terms".to_string()));
        }

        let all_terms = self
            .equipment_terms
            .iter()
            .chain(&self.brand_terms)
            .chain(&self.facility_terms)
            .chain(self.modality_map.iter().flat_map(|m| &m.terms));

        for term in all_terms {
            if term.trim().is_empty() {
                return Err(ScoutError::ConfigError("catalog contains an empty term".to_string()));
            }
        }

        if let Some(entry) = self.modality_map.iter().find(|m| m.code.trim().is_empty()) {
            return Err(ScoutError::ConfigError(format!(
                "modality entry with terms {:?} has no code",
                entry.terms
            )));
        }

        Ok(())
    }

    /// Returns a copy with additional equipment keywords appended after the built-in ones.
    ///
    /// Blank keywords and keywords already present (case-insensitively) are skipped.
    pub fn with_extra_equipment<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = self.clone();
        for term in extra {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            let lower = term.to_lowercase();
            if catalog.equipment_terms.iter().any(|t| t.to_lowercase() == lower) {
                continue;
            }
            catalog.equipment_terms.push(term.to_string());
        }
        catalog
    }
}
