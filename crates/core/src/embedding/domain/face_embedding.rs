use serde::{Deserialize, Serialize};

/// Comparator used to measure how far apart two face embeddings are.
///
/// Each extractor reports the metric its embeddings are meant to be
/// compared with; the tolerance is always applied on that scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// L2 distance.
    Euclidean,
    /// `1 - cosine similarity`, in `[0, 2]`.
    Cosine,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Euclidean => write!(f, "euclidean"),
            DistanceMetric::Cosine => write!(f, "cosine"),
        }
    }
}

/// A fixed-length vector summarizing one detected face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceEmbedding(Vec<f32>);

impl FaceEmbedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    /// Distance to `other` under `metric`.
    ///
    /// Embeddings of different dimension are infinitely far apart, so they
    /// never fall within any tolerance.
    pub fn distance(&self, other: &FaceEmbedding, metric: DistanceMetric) -> f64 {
        if self.dimension() != other.dimension() {
            return f64::INFINITY;
        }
        match metric {
            DistanceMetric::Euclidean => self
                .0
                .iter()
                .zip(other.0.iter())
                .map(|(a, b)| {
                    let d = *a as f64 - *b as f64;
                    d * d
                })
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Cosine => {
                let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
                for (a, b) in self.0.iter().zip(other.0.iter()) {
                    let (a, b) = (*a as f64, *b as f64);
                    dot += a * b;
                    norm_a += a * a;
                    norm_b += b * b;
                }
                if norm_a > 0.0 && norm_b > 0.0 {
                    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
                } else {
                    1.0
                }
            }
        }
    }
}

impl From<Vec<f32>> for FaceEmbedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Scale `v` to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
