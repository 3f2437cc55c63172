use std::path::Path;

use serde::Serialize;

use crate::{
    descriptor::{
        BUNDLED_DESCRIPTOR, Capability, Descriptor, DescriptorError,
        error::{inconsistent, not_found},
        load_descriptor, parse_descriptor,
    },
    registry::model_key::ModelKey,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyPolicy {
    /// Log mismatching identifiers and keep loading.
    #[default]
    Warn,
    /// Refuse a descriptor with any mismatching identifier.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    MalformedKey { key: String },
    VendorMismatch { key: String, vendor: String },
    FirmwareMismatch { key: String, firmware: String },
}

impl ConsistencyIssue {
    pub fn key(&self) -> &str {
        match self {
            ConsistencyIssue::MalformedKey { key }
            | ConsistencyIssue::VendorMismatch { key, .. }
            | ConsistencyIssue::FirmwareMismatch { key, .. } => key,
        }
    }

    fn describe(&self, descriptor: &Descriptor) -> String {
        match self {
            ConsistencyIssue::MalformedKey { key } => {
                format!("capability key '{key}' is not '<vendor>, <model>, <firmware>'")
            }
            ConsistencyIssue::VendorMismatch { key, vendor } => format!(
                "capability key '{key}' names vendor '{vendor}' but descriptor vendor is '{}'",
                descriptor.vendor
            ),
            ConsistencyIssue::FirmwareMismatch { key, firmware } => format!(
                "capability key '{key}' names firmware '{firmware}' but descriptor version is '{}'",
                descriptor.version
            ),
        }
    }
}

/// Lists capability keys whose vendor or firmware part disagrees with the descriptor.
pub fn check_consistency(descriptor: &Descriptor) -> Vec<ConsistencyIssue> {
    let mut issues = Vec::new();
    for key in descriptor.capabilities.keys() {
        let Ok(parsed) = key.parse::<ModelKey>() else {
            issues.push(ConsistencyIssue::MalformedKey {
                key: key.to_string(),
            });
            continue;
        };
        if parsed.vendor != descriptor.vendor {
            issues.push(ConsistencyIssue::VendorMismatch {
                key: key.to_string(),
                vendor: parsed.vendor.clone(),
            });
        }
        if parsed.firmware != descriptor.version {
            issues.push(ConsistencyIssue::FirmwareMismatch {
                key: key.to_string(),
                firmware: parsed.firmware,
            });
        }
    }
    issues
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub vendor: String,
    pub version: String,
    pub description: String,
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub id: String,
    pub sip_lines: u32,
    pub high_availability: bool,
    pub funckeys: u32,
    pub tested: bool,
}

/// Read-only capability lookup over one descriptor.
///
/// Nothing is mutated after construction, so a registry can be shared between threads
/// behind a plain reference or `Arc`.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    descriptor: Descriptor,
}

impl CapabilityRegistry {
    pub fn from_descriptor(
        descriptor: Descriptor,
        policy: ConsistencyPolicy,
    ) -> Result<Self, DescriptorError> {
        let issues = check_consistency(&descriptor);
        if policy == ConsistencyPolicy::Strict
            && let Some(issue) = issues.first()
        {
            return Err(inconsistent(issue.key(), issue.describe(&descriptor)));
        }
        for issue in &issues {
            tracing::warn!(
                target: "registry",
                key = %issue.key(),
                detail = %issue.describe(&descriptor),
                "capability_key_inconsistent"
            );
        }

        tracing::info!(
            target: "registry",
            vendor = %descriptor.vendor,
            version = %descriptor.version,
            models = descriptor.capabilities.len(),
            "capability_registry_loaded"
        );
        Ok(Self { descriptor })
    }

    pub fn from_json_str(text: &str, policy: ConsistencyPolicy) -> Result<Self, DescriptorError> {
        Self::from_descriptor(parse_descriptor(text)?, policy)
    }

    pub fn load(path: &Path, policy: ConsistencyPolicy) -> Result<Self, DescriptorError> {
        Self::from_descriptor(load_descriptor(path)?, policy)
    }

    pub fn bundled(policy: ConsistencyPolicy) -> Result<Self, DescriptorError> {
        Self::from_json_str(BUNDLED_DESCRIPTOR, policy)
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn get(&self, id: &str) -> Option<&Capability> {
        self.descriptor.capabilities.get(id)
    }

    pub fn lookup(&self, id: &str) -> Result<&Capability, DescriptorError> {
        self.get(id).ok_or_else(|| not_found(id))
    }

    /// Finds a model by its parts. Keys spelled with other spacing around the commas,
    /// such as `"Grandstream,GXP2130,1.0.11.48"`, still match.
    pub fn lookup_model(&self, vendor: &str, model: &str, firmware: &str) -> Option<&Capability> {
        let wanted = ModelKey::new(vendor, model, firmware);
        self.get(&wanted.to_string()).or_else(|| {
            self.iter()
                .find(|(key, _)| key.parse::<ModelKey>().is_ok_and(|parsed| parsed == wanted))
                .map(|(_, capability)| capability)
        })
    }

    /// Looks a model up under this descriptor's own vendor and version.
    pub fn capability_for_model(&self, model: &str) -> Option<&Capability> {
        self.lookup_model(&self.descriptor.vendor, model, &self.descriptor.version)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Capability)> {
        self.descriptor.capabilities.iter()
    }

    pub fn model_keys(&self) -> Vec<ModelKey> {
        self.descriptor
            .capabilities
            .keys()
            .filter_map(|key| key.parse().ok())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptor.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptor.capabilities.is_empty()
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            vendor: self.descriptor.vendor.clone(),
            version: self.descriptor.version.clone(),
            description: self.descriptor.description.clone(),
            models: self
                .iter()
                .map(|(id, capability)| ModelSummary {
                    id: id.to_string(),
                    sip_lines: capability.sip_lines.get(),
                    high_availability: capability.high_availability.get(),
                    funckeys: capability.funckeys,
                    tested: capability.tested.get(),
                })
                .collect(),
        }
    }
}
