use crate::errors::AppError;

/// Caller-supplied report text. Guaranteed non-blank; otherwise kept exactly as received,
/// since the rephrase fallback hands it back unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentText(String);

impl IncidentText {
    /// Rejects missing, empty and whitespace-only text before any inference call is spent.
    pub fn parse(raw: Option<String>) -> Result<Self, AppError> {
        match raw {
            Some(text) if !text.trim().is_empty() => Ok(Self(text)),
            Some(_) => Err(AppError::Validation("text cannot be empty".to_string())),
            None => Err(AppError::Validation("text is required".to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
