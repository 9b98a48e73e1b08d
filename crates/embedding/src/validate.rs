//! Request validation. Runs before any provider call.

use crate::config::EmbeddingConfig;
use crate::ValidationError;

pub fn validate_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(())
}

/// Resolve the requested dimensionality (falling back to the configured default) and
/// check it against the provider's supported range.
pub fn resolve_dimensions(
    requested: Option<usize>,
    cfg: &EmbeddingConfig,
) -> Result<usize, ValidationError> {
    let dims = requested.unwrap_or(cfg.default_dimensions);
    if dims < cfg.min_dimensions || dims > cfg.max_dimensions {
        return Err(ValidationError::DimensionsOutOfRange {
            requested: dims,
            min: cfg.min_dimensions,
            max: cfg.max_dimensions,
        });
    }
    Ok(dims)
}

/// Size check first, so an oversized batch is reported as such even if it also holds blanks.
pub fn validate_batch(texts: &[String], max_batch_size: usize) -> Result<(), ValidationError> {
    if texts.is_empty() {
        return Err(ValidationError::EmptyBatch);
    }
    if texts.len() > max_batch_size {
        return Err(ValidationError::BatchTooLarge {
            len: texts.len(),
            max: max_batch_size,
        });
    }
    if let Some(index) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyTextAt { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(validate_text(""), Err(ValidationError::EmptyText));
        assert_eq!(validate_text("  \n\t"), Err(ValidationError::EmptyText));
        assert!(validate_text("hello").is_ok());
    }

    #[test]
    fn dimensions_default_and_bounds() {
        let cfg = EmbeddingConfig::default();
        assert_eq!(resolve_dimensions(None, &cfg), Ok(768));
        assert_eq!(resolve_dimensions(Some(128), &cfg), Ok(128));
        assert_eq!(resolve_dimensions(Some(3072), &cfg), Ok(3072));
        assert_eq!(
            resolve_dimensions(Some(0), &cfg),
            Err(ValidationError::DimensionsOutOfRange {
                requested: 0,
                min: 128,
                max: 3072
            })
        );
        assert!(resolve_dimensions(Some(3073), &cfg).is_err());
    }

    #[test]
    fn batch_bounds() {
        let texts = |n: usize| (0..n).map(|i| format!("text {i}")).collect::<Vec<_>>();
        assert_eq!(validate_batch(&[], 10), Err(ValidationError::EmptyBatch));
        assert!(validate_batch(&texts(10), 10).is_ok());
        assert_eq!(
            validate_batch(&texts(11), 10),
            Err(ValidationError::BatchTooLarge { len: 11, max: 10 })
        );
    }

    #[test]
    fn blank_item_reports_its_index() {
        let texts = vec!["a".to_string(), "b".to_string(), " ".to_string()];
        assert_eq!(
            validate_batch(&texts, 10),
            Err(ValidationError::EmptyTextAt { index: 2 })
        );
    }
}
