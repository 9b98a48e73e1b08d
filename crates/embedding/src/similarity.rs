use crate::normalize::l2_norm;
use crate::types::EmbeddingVector;
use crate::EmbeddingError;

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity of two post-processed vectors.
///
/// When both inputs are already unit length (`normalized == true`) the dot product is the
/// cosine. Otherwise the dot product is divided by the product of the norms. The score is
/// clamped to `[-1, 1]` so rounding never leaks outside the documented range.
pub fn cosine_similarity(
    a: &EmbeddingVector,
    b: &EmbeddingVector,
    normalized: bool,
) -> Result<f64, EmbeddingError> {
    if a.dimension() != b.dimension() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.dimension(),
            actual: b.dimension(),
        });
    }

    let product = dot(a.as_slice(), b.as_slice());
    let score = if normalized {
        product
    } else {
        let norms = l2_norm(a.as_slice()) * l2_norm(b.as_slice());
        if norms == 0.0 || !norms.is_finite() {
            return Err(EmbeddingError::DegenerateVector);
        }
        product / norms
    };

    Ok(score.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::post_process;

    fn v(values: &[f64]) -> EmbeddingVector {
        EmbeddingVector::new(values.to_vec())
    }

    #[test]
    fn identical_normalized_vectors_score_one() {
        let a = post_process(vec![0.3, -1.2, 4.5, 0.01], 4, true).unwrap();
        let score = cosine_similarity(&a, &a.clone(), true).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn raw_vectors_use_norm_division() {
        let a = v(&[3.0, 0.0]);
        let b = v(&[10.0, 0.0]);
        assert!((cosine_similarity(&a, &b, false).unwrap() - 1.0).abs() < 1e-12);

        let c = v(&[0.0, 5.0]);
        assert!(cosine_similarity(&a, &c, false).unwrap().abs() < 1e-12);

        let d = v(&[-2.0, 0.0]);
        assert!((cosine_similarity(&a, &d, false).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn similarity_is_commutative() {
        let a = v(&[0.1, 0.7, -0.3, 2.2]);
        let b = v(&[1.5, -0.2, 0.9, 0.4]);
        assert_eq!(
            cosine_similarity(&a, &b, false).unwrap(),
            cosine_similarity(&b, &a, false).unwrap()
        );

        let an = post_process(a.into_inner(), 4, true).unwrap();
        let bn = post_process(b.into_inner(), 4, true).unwrap();
        assert_eq!(
            cosine_similarity(&an, &bn, true).unwrap(),
            cosine_similarity(&bn, &an, true).unwrap()
        );
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = cosine_similarity(&v(&[1.0, 2.0]), &v(&[1.0]), true).unwrap_err();
        assert_eq!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn zero_vector_is_degenerate_without_normalization() {
        let err = cosine_similarity(&v(&[0.0, 0.0]), &v(&[1.0, 1.0]), false).unwrap_err();
        assert_eq!(err, EmbeddingError::DegenerateVector);
    }

    #[test]
    fn score_is_clamped() {
        // Slightly over unit length on purpose; the clamp keeps the contract.
        let a = v(&[1.0 + 1e-12, 0.0]);
        let score = cosine_similarity(&a, &a.clone(), true).unwrap();
        assert!(score <= 1.0);
    }
}
