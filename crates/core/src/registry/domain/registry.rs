use thiserror::Error;

use crate::embedding::domain::face_embedding::FaceEmbedding;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{embeddings} embeddings but {labels} labels")]
    LengthMismatch { embeddings: usize, labels: usize },
    #[error("embedding for '{label}' has dimension {found}, expected {expected}")]
    DimensionMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("embedding for '{label}' contains a non-finite value")]
    NonFinite { label: String },
}

/// Known identities: parallel sequences of reference embeddings and labels.
///
/// Labels may repeat; every entry is compared independently. All
/// embeddings share one dimension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Registry {
    embeddings: Vec<FaceEmbedding>,
    labels: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from its persisted parts, validating the invariants.
    pub fn from_parts(
        embeddings: Vec<FaceEmbedding>,
        labels: Vec<String>,
    ) -> Result<Self, RegistryError> {
        if embeddings.len() != labels.len() {
            return Err(RegistryError::LengthMismatch {
                embeddings: embeddings.len(),
                labels: labels.len(),
            });
        }
        let mut registry = Self::new();
        for (embedding, label) in embeddings.into_iter().zip(labels) {
            registry.push(label, embedding)?;
        }
        Ok(registry)
    }

    /// Append an identity. Rejects embeddings whose dimension differs from
    /// the entries already registered, and NaN or infinite components,
    /// which JSON cannot represent.
    pub fn push(&mut self, label: String, embedding: FaceEmbedding) -> Result<(), RegistryError> {
        if !embedding.values().iter().all(|v| v.is_finite()) {
            return Err(RegistryError::NonFinite { label });
        }
        if let Some(expected) = self.dimension() {
            if embedding.dimension() != expected {
                return Err(RegistryError::DimensionMismatch {
                    label,
                    expected,
                    found: embedding.dimension(),
                });
            }
        }
        self.embeddings.push(embedding);
        self.labels.push(label);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Embedding dimension, or `None` for an empty registry.
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(FaceEmbedding::dimension)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn embeddings(&self) -> &[FaceEmbedding] {
        &self.embeddings
    }

    /// `(label, embedding)` pairs in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FaceEmbedding)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.embeddings.iter())
    }

    pub fn into_parts(self) -> (Vec<FaceEmbedding>, Vec<String>) {
        (self.embeddings, self.labels)
    }
}
