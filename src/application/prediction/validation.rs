use crate::domain::errors::PredictionError;
use crate::domain::prediction::MAX_TEXT_LENGTH;

/// Reject empty or whitespace-only text first, then anything over the length cap.
pub fn validate_text(text: &str) -> Result<(), PredictionError> {
    if text.trim().is_empty() {
        return Err(PredictionError::EmptyInput);
    }

    let length = text.chars().count();
    if length > MAX_TEXT_LENGTH {
        return Err(PredictionError::TooLong {
            length,
            max: MAX_TEXT_LENGTH,
        });
    }

    Ok(())
}
