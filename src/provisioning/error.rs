use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningErrorKind {
    UnsupportedConfig,
    InvalidDevice,
    InvalidField,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProvisioningError {
    pub kind: ProvisioningErrorKind,
    pub message: String,
}

impl ProvisioningError {
    pub fn new(kind: ProvisioningErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn unsupported_config(message: impl Into<String>) -> ProvisioningError {
    ProvisioningError::new(ProvisioningErrorKind::UnsupportedConfig, message)
}

pub fn invalid_device(message: impl Into<String>) -> ProvisioningError {
    ProvisioningError::new(ProvisioningErrorKind::InvalidDevice, message)
}

pub fn invalid_field(message: impl Into<String>) -> ProvisioningError {
    ProvisioningError::new(ProvisioningErrorKind::InvalidField, message)
}
