//! Species-code to common-name lookup.
//!
//! Some responses carry only `speciesCode`. The built-in table covers the
//! default owl list plus a handful of commonly flagged rarities; a YAML file
//! of `code: Common Name` pairs can extend or override it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

const BUILTIN_NAMES: &[(&str, &str)] = &[
    ("grhowl", "Great Horned Owl"),
    ("brnowl", "Barn Owl"),
    ("wesowl1", "Western Screech-Owl"),
    ("easowl1", "Eastern Screech-Owl"),
    ("nopowl", "Northern Pygmy-Owl"),
    ("nswowl", "Northern Saw-whet Owl"),
    ("brdowl", "Barred Owl"),
    ("burowl", "Burrowing Owl"),
    ("spoowl", "Spotted Owl"),
    ("loeowl", "Long-eared Owl"),
    ("sheowl", "Short-eared Owl"),
    ("snoowl1", "Snowy Owl"),
    ("flaowl", "Flammulated Owl"),
    ("elfowl", "Elf Owl"),
    ("lbbgul", "Lesser Black-backed Gull"),
    ("tunswa", "Tundra Swan"),
    ("yebmag", "Yellow-billed Magpie"),
    ("calcon", "California Condor"),
];

#[derive(Debug, Error)]
pub enum SpeciesTableError {
    #[error("failed to read species names from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid species names YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesTable {
    names: HashMap<String, String>,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SpeciesTable {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_NAMES
                .iter()
                .map(|(code, name)| ((*code).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Built-in table extended with the entries of a YAML mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesTableError::Yaml`] if the document is not a
    /// string-to-string mapping.
    pub fn with_yaml_overrides(yaml: &str) -> Result<Self, SpeciesTableError> {
        let overrides: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        let mut table = Self::builtin();
        table.names.extend(overrides);
        Ok(table)
    }

    /// Reads overrides from `path`; see [`Self::with_yaml_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`SpeciesTableError::Io`] if the file cannot be read, or
    /// [`SpeciesTableError::Yaml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, SpeciesTableError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| SpeciesTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::with_yaml_overrides(&yaml)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded species names");
        Ok(table)
    }

    #[must_use]
    pub fn name(&self, species_code: &str) -> Option<&str> {
        self.names.get(species_code).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
