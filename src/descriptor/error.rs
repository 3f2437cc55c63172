use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorErrorKind {
    Io,
    Syntax,
    SchemaViolation,
    DuplicateKey,
    InvalidField,
    Inconsistent,
    NotFound,
    Internal,
}

/// Failure to load, validate or query a plugin descriptor.
///
/// `field` carries the offending location when one is known: a JSON pointer for schema
/// violations, the capability key for duplicates and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DescriptorError {
    pub kind: DescriptorErrorKind,
    pub message: String,
    pub field: Option<String>,
}

impl DescriptorError {
    pub fn new(kind: DescriptorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

pub fn io_error(message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::Io, message)
}

pub fn syntax_error(message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::Syntax, message)
}

pub fn schema_violation(field: impl Into<String>, message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::SchemaViolation, message).with_field(field)
}

pub fn duplicate_key(key: &str) -> DescriptorError {
    DescriptorError::new(
        DescriptorErrorKind::DuplicateKey,
        format!("duplicate capability key '{key}'"),
    )
    .with_field(format!("/capabilities/{key}"))
}

pub fn invalid_field(message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::InvalidField, message)
}

pub fn inconsistent(key: &str, message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::Inconsistent, message)
        .with_field(format!("/capabilities/{key}"))
}

pub fn not_found(id: &str) -> DescriptorError {
    DescriptorError::new(
        DescriptorErrorKind::NotFound,
        format!("no capability registered for '{id}'"),
    )
    .with_field(id)
}

pub fn internal_error(message: impl Into<String>) -> DescriptorError {
    DescriptorError::new(DescriptorErrorKind::Internal, message)
}
