use crate::embedding::domain::face_embedding::{DistanceMetric, FaceEmbedding};
use crate::registry::domain::registry::Registry;
use crate::shared::constants::DEFAULT_TOLERANCE;

/// Outcome of comparing the faces of one photo with the registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Distinct matching labels, in the order they were first matched.
    pub labels: Vec<String>,
    /// Number of (face, registry entry) pairs within tolerance.
    pub matches: usize,
}

impl MatchResult {
    pub fn is_unmatched(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Assigns faces to registered identities by embedding distance.
///
/// Every face is compared with every registry entry; an entry matches when
/// `distance <= tolerance` on the extractor's metric. A face may therefore
/// match several entries, and a photo may land in several folders.
#[derive(Clone, Copy, Debug)]
pub struct IdentityMatcher {
    tolerance: f64,
}

impl IdentityMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn classify(
        &self,
        faces: &[FaceEmbedding],
        registry: &Registry,
        metric: DistanceMetric,
    ) -> MatchResult {
        let mut result = MatchResult::default();
        for face in faces {
            for (label, known) in registry.entries() {
                let distance = face.distance(known, metric);
                if distance <= self.tolerance {
                    log::trace!("face matches '{label}' at distance {distance:.4}");
                    result.matches += 1;
                    if !result.labels.iter().any(|l| l == label) {
                        result.labels.push(label.to_string());
                    }
                }
            }
        }
        result
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn emb(values: &[f32]) -> FaceEmbedding {
        FaceEmbedding::new(values.to_vec())
    }

    fn registry(entries: &[(&str, &[f32])]) -> Registry {
        let mut registry = Registry::new();
        for (label, values) in entries {
            registry.push(label.to_string(), emb(values)).unwrap();
        }
        registry
    }

    #[test]
    fn test_no_faces_is_unmatched() {
        let result = IdentityMatcher::default().classify(
            &[],
            &registry(&[("alice", &[1.0, 0.0])]),
            DistanceMetric::Cosine,
        );
        assert!(result.is_unmatched());
        assert_eq!(result.matches, 0);
    }

    #[test]
    fn test_single_face_single_identity() {
        let result = IdentityMatcher::default().classify(
            &[emb(&[0.9, 0.1])],
            &registry(&[("alice", &[1.0, 0.0]), ("bob", &[0.0, 1.0])]),
            DistanceMetric::Cosine,
        );
        assert_eq!(result.labels, vec!["alice"]);
        assert_eq!(result.matches, 1);
    }

    #[test]
    fn test_two_faces_two_identities_in_first_seen_order() {
        let result = IdentityMatcher::default().classify(
            &[emb(&[0.0, 1.0]), emb(&[1.0, 0.0])],
            &registry(&[("alice", &[1.0, 0.0]), ("bob", &[0.0, 1.0])]),
            DistanceMetric::Cosine,
        );
        assert_eq!(result.labels, vec!["bob", "alice"]);
        assert_eq!(result.matches, 2);
    }

    #[test]
    fn test_duplicate_labels_count_each_entry_but_one_folder() {
        let result = IdentityMatcher::default().classify(
            &[emb(&[1.0, 0.0])],
            &registry(&[("alice", &[1.0, 0.0]), ("alice", &[0.95, 0.05])]),
            DistanceMetric::Cosine,
        );
        assert_eq!(result.labels, vec!["alice"]);
        assert_eq!(result.matches, 2);
    }

    #[rstest]
    #[case(0.5, true)]
    #[case(0.4999, false)]
    fn test_tolerance_is_inclusive(#[case] tolerance: f64, #[case] matched: bool) {
        // Euclidean distance between the two vectors is exactly 0.5
        let result = IdentityMatcher::new(tolerance).classify(
            &[emb(&[0.0, 0.5])],
            &registry(&[("alice", &[0.0, 0.0])]),
            DistanceMetric::Euclidean,
        );
        assert_eq!(!result.is_unmatched(), matched);
    }

    #[test]
    fn test_metric_changes_outcome() {
        // Same direction, very different length
        let faces = [emb(&[10.0, 0.0])];
        let known = registry(&[("alice", &[1.0, 0.0])]);
        let matcher = IdentityMatcher::default();
        assert!(!matcher
            .classify(&faces, &known, DistanceMetric::Cosine)
            .is_unmatched());
        assert!(matcher
            .classify(&faces, &known, DistanceMetric::Euclidean)
            .is_unmatched());
    }

    #[test]
    fn test_empty_registry_matches_nothing() {
        let result = IdentityMatcher::default().classify(
            &[emb(&[1.0, 0.0])],
            &Registry::new(),
            DistanceMetric::Cosine,
        );
        assert!(result.is_unmatched());
    }

    #[test]
    fn test_other_dimension_never_matches() {
        let result = IdentityMatcher::new(f64::MAX).classify(
            &[emb(&[1.0, 0.0, 0.0])],
            &registry(&[("alice", &[1.0, 0.0])]),
            DistanceMetric::Euclidean,
        );
        assert!(result.is_unmatched());
    }
}
