use crate::error::{ServiceError, ServiceResult};

/// Cosine similarity of two equal-length vectors, clamped to [-1, 1].
/// A zero vector has similarity 0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0) as f32
}

/// Similarity matrix of `a` (rows) against `b` (columns).
/// Every vector in both inputs must share one dimensionality.
pub fn cosine_similarity_matrix(a: &[Vec<f32>], b: &[Vec<f32>]) -> ServiceResult<Vec<Vec<f32>>> {
    let expected = match a.first().or_else(|| b.first()) {
        Some(v) => v.len(),
        None => return Ok(Vec::new()),
    };
    if let Some(bad) = a.iter().chain(b).find(|v| v.len() != expected) {
        return Err(ServiceError::DimensionMismatch {
            expected,
            actual: bad.len(),
        });
    }

    Ok(a
        .iter()
        .map(|row| b.iter().map(|col| cosine_similarity(row, col)).collect())
        .collect())
}
