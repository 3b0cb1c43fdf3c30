use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl FilterError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
