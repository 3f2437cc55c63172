use std::collections::BTreeMap;

use crate::{
    config::ProvisioningConfig,
    provisioning::error::{ProvisioningError, invalid_field},
};

const BUILTIN_TIMEZONES: &[(&str, &str)] = &[(
    "Europe/Paris",
    "CET-1CEST-2,M3.5.0/02:00:00,M10.5.0/03:00:00",
)];

const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("de_DE", "de"),
    ("es_ES", "es"),
    ("fr_FR", "fr"),
    ("fr_CA", "fr"),
    ("it_IT", "it"),
    ("nl_NL", "nl"),
    ("en_US", "en"),
];

/// Lookup tables applied while building a provisioning plan.
#[derive(Debug, Clone)]
pub struct ProvisioningSettings {
    default_timezone: String,
    timezones: BTreeMap<String, String>,
    locales: BTreeMap<String, String>,
}

impl ProvisioningSettings {
    /// Merges configured tables over the built-in ones. The default timezone must resolve.
    pub fn from_config(config: &ProvisioningConfig) -> Result<Self, ProvisioningError> {
        let mut timezones = builtin(BUILTIN_TIMEZONES);
        timezones.extend(config.timezones.clone());
        let mut locales = builtin(BUILTIN_LOCALES);
        locales.extend(config.locales.clone());

        if !timezones.contains_key(&config.default_timezone) {
            return Err(invalid_field(format!(
                "default timezone '{}' has no POSIX definition",
                config.default_timezone
            )));
        }

        Ok(Self {
            default_timezone: config.default_timezone.clone(),
            timezones,
            locales,
        })
    }

    /// POSIX TZ string for `name`, or for the default timezone when `name` is unknown.
    pub fn timezone_for(&self, name: Option<&str>) -> &str {
        name.and_then(|name| self.timezones.get(name))
            .or_else(|| self.timezones.get(&self.default_timezone))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn language_for(&self, locale: &str) -> Option<&str> {
        self.locales.get(locale).map(String::as_str)
    }
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self {
            default_timezone: BUILTIN_TIMEZONES[0].0.to_string(),
            timezones: builtin(BUILTIN_TIMEZONES),
            locales: builtin(BUILTIN_LOCALES),
        }
    }
}

fn builtin(table: &[(&str, &str)]) -> BTreeMap<String, String> {
    table
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
