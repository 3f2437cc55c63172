use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// Parsed form of a `"<Vendor>, <Model>, <Firmware>"` capability identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ModelKey {
    pub vendor: String,
    pub model: String,
    pub firmware: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a '<vendor>, <model>, <firmware>' identifier")]
pub struct ModelKeyParseError(pub String);

impl ModelKey {
    pub fn new(
        vendor: impl Into<String>,
        model: impl Into<String>,
        firmware: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            firmware: firmware.into(),
        }
    }
}

impl FromStr for ModelKey {
    type Err = ModelKeyParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [vendor, model, firmware]
                if !vendor.is_empty() && !model.is_empty() && !firmware.is_empty() =>
            {
                Ok(ModelKey::new(*vendor, *model, *firmware))
            }
            _ => Err(ModelKeyParseError(raw.to_string())),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.vendor, self.model, self.firmware)
    }
}
