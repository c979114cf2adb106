//! Label registry: the bidirectional class id <-> crop name mapping
//!
//! The registry is built once, at training time, from the distinct labels of
//! the dataset and shipped inside the model artifact. Serving never rebuilds
//! it. Canonical order is plain byte-wise lexicographic order of the UTF-8
//! label strings (`Ord for str`): case-sensitive, no locale collation, no
//! trimming. Deserialization re-checks that order, so a hand-edited or
//! foreign table is rejected instead of silently shifting every id.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::types::ClassId;

/// Canonically ordered, duplicate-free list of crop names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelRegistry {
    labels: Vec<String>,
}

impl LabelRegistry {
    /// Build the registry from raw labels (duplicates allowed)
    pub fn build<I, S>(labels: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        labels.sort_unstable();
        labels.dedup();

        if labels.is_empty() {
            return Err(RegistryError::Empty);
        }

        Ok(Self { labels })
    }

    /// Class id of a crop name, if the name was part of the training set
    pub fn encode(&self, name: &str) -> Option<ClassId> {
        self.labels
            .binary_search_by(|label| label.as_str().cmp(name))
            .ok()
    }

    /// Crop name of a class id
    pub fn decode(&self, id: ClassId) -> Result<&str, RegistryError> {
        self.labels
            .get(id)
            .map(String::as_str)
            .ok_or(RegistryError::UnknownClassId {
                id,
                len: self.labels.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in class id order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }
}

impl TryFrom<Vec<String>> for LabelRegistry {
    type Error = RegistryError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        if labels.is_empty() {
            return Err(RegistryError::Empty);
        }

        for (position, pair) in labels.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(RegistryError::NotCanonical {
                    position: position + 1,
                    previous: pair[0].clone(),
                    current: pair[1].clone(),
                });
            }
        }

        Ok(Self { labels })
    }
}

impl From<LabelRegistry> for Vec<String> {
    fn from(registry: LabelRegistry) -> Self {
        registry.labels
    }
}
