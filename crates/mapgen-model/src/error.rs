use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{what} must not be empty")]
    EmptyName { what: &'static str },
    #[error("unknown mapping type: {0}")]
    UnknownMappingType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// Trim a user supplied name, rejecting blank input.
pub(crate) fn validate_name(what: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyName { what });
    }
    Ok(trimmed.to_string())
}
