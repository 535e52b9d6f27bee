//! Cosine similarity for embedding vectors.

use kb_core::{Error, Result};

/// Calculate cosine similarity between two vectors.
///
/// A zero-magnitude input yields `0.0`. Accumulation happens in `f64` and the
/// result is clamped into `[-1, 1]`.
///
/// # Errors
/// Returns `InvalidInput` when the vectors have different lengths
pub fn cosine_similarity(vector_a: &[f32], vector_b: &[f32]) -> Result<f32> {
    if vector_a.len() != vector_b.len() {
        return Err(Error::InvalidInput(format!(
            "vector length mismatch: {} vs {}",
            vector_a.len(),
            vector_b.len()
        )));
    }

    let (dot_product, norm_a, norm_b) = vector_a.iter().zip(vector_b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, left, right), (&component_a, &component_b)| {
            let (first, second) = (f64::from(component_a), f64::from(component_b));
            (
                dot + first * second,
                left + first * first,
                right + second * second,
            )
        },
    );

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot_product / (norm_a.sqrt() * norm_b.sqrt());
    Ok(similarity.clamp(-1.0, 1.0) as f32)
}
