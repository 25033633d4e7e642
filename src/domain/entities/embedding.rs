use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    pub fn new(vec: Vec<f32>) -> Self {
        Self(vec)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Cosine similarity against another embedding.
    ///
    /// A dimension mismatch is a programming error, not a recoverable
    /// condition, so it panics. Zero-norm vectors score 0.0.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        assert_eq!(
            self.0.len(),
            other.0.len(),
            "embedding dimension mismatch: {} vs {}",
            self.0.len(),
            other.0.len()
        );

        let dot_product: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        let norm_a: f32 = self.0.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = other.0.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(vec: Vec<f32>) -> Self {
        Self(vec)
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_similarity_is_one() {
        let a = Embedding::new(vec![0.3, -1.2, 4.5]);
        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        let zero = Embedding::new(vec![0.0, 0.0, 0.0]);
        let other = Embedding::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(zero.cosine_similarity(&other), 0.0);
        assert_eq!(other.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![0.0, 1.0]);
        assert!(a.cosine_similarity(&b).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        let a = Embedding::new(vec![1.0, 2.0]);
        let b = Embedding::new(vec![-1.0, -2.0]);
        assert!((a.cosine_similarity(&b) + 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn test_dimension_mismatch_panics() {
        let a = Embedding::new(vec![1.0, 2.0]);
        let b = Embedding::new(vec![1.0, 2.0, 3.0]);
        a.cosine_similarity(&b);
    }
}
