use crate::types::EmbeddingVector;
use crate::EmbeddingError;

/// Euclidean norm, accumulated in f64.
pub(crate) fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// In-place L2 normalization. Zero and non-finite norms are rejected.
pub(crate) fn l2_normalize_in_place(v: &mut [f64]) -> Result<(), EmbeddingError> {
    let norm = l2_norm(v);
    if norm == 0.0 || !norm.is_finite() {
        return Err(EmbeddingError::DegenerateVector);
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
    Ok(())
}

/// Turns a raw provider vector into the vector returned to the caller.
///
/// The requested dimensionality is sent to the provider as a generation parameter, so a
/// length mismatch here is a provider contract violation and is never papered over by
/// truncating or padding.
pub fn post_process(
    raw: Vec<f64>,
    expected_dimensions: usize,
    normalize: bool,
) -> Result<EmbeddingVector, EmbeddingError> {
    if raw.len() != expected_dimensions {
        return Err(EmbeddingError::DimensionMismatch {
            expected: expected_dimensions,
            actual: raw.len(),
        });
    }

    let mut values = raw;
    if normalize {
        l2_normalize_in_place(&mut values)?;
    }
    Ok(EmbeddingVector::new(values))
}
