use std::path::Path;

use serde::{Deserialize, Serialize};

/// Advisory vocabularies for the enumerated listing fields. Deployments may
/// override them from a YAML file; the core never enforces membership, so a
/// historical record with a retired type stays readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    pub property_types: Vec<String>,
    pub listing_types: Vec<String>,
    pub statuses: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            property_types: ["house", "apartment", "villa", "land"].map(String::from).to_vec(),
            listing_types: ["sale", "rent"].map(String::from).to_vec(),
            statuses: ["available", "reserved", "sold", "rented"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid vocabulary file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl Vocabulary {
    pub fn from_yaml(text: &str) -> Result<Self, VocabularyError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    pub fn is_known_property_type(&self, value: &str) -> bool {
        self.property_types.iter().any(|t| t == value)
    }

    pub fn is_known_listing_type(&self, value: &str) -> bool {
        self.listing_types.iter().any(|t| t == value)
    }

    pub fn is_known_status(&self, value: &str) -> bool {
        self.statuses.iter().any(|s| s == value)
    }
}
