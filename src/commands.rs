use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    cli::{Command, USAGE},
    config::Config,
    device::{Device, extract_device_info},
    provisioning::{ProvisioningSettings, RawConfig, configure},
    registry::{CapabilityRegistry, ConsistencyPolicy},
};

/// Runs `command` and renders its result as pretty JSON. Commands that read capabilities
/// load the descriptor named by `config`; `Command::Help` returns the usage text.
pub fn run(command: &Command, config: &Config) -> Result<String> {
    match command {
        Command::Help => Ok(USAGE.to_string()),
        Command::Capabilities => render(&open_registry(config)?.summary()),
        Command::Lookup { identifier } => {
            let registry = open_registry(config)?;
            render(registry.lookup(identifier)?)
        }
        Command::Validate { descriptor_path } => {
            let checked = CapabilityRegistry::load(descriptor_path, ConsistencyPolicy::Strict)
                .with_context(|| format!("{} is invalid", descriptor_path.display()))?;
            render(&checked.summary())
        }
        Command::Identify { user_agent } => {
            let info = extract_device_info(user_agent)
                .ok_or_else(|| anyhow!("unrecognized user agent: {user_agent}"))?;
            render(&info)
        }
        Command::Configure {
            device_path,
            raw_config_path,
        } => {
            let registry = open_registry(config)?;
            let settings = ProvisioningSettings::from_config(&config.provisioning)?;
            let device: Device = read_json(device_path)?;
            let raw_config: RawConfig = read_json(raw_config_path)?;
            let plan = configure(&registry, &settings, &device, &raw_config)?;
            render(&plan)
        }
    }
}

fn open_registry(config: &Config) -> Result<CapabilityRegistry> {
    let policy = config.descriptor.consistency_policy();
    let registry = match &config.descriptor.path {
        Some(path) => CapabilityRegistry::load(path, policy)
            .with_context(|| format!("failed to load descriptor {}", path.display()))?,
        None => CapabilityRegistry::bundled(policy).context("bundled descriptor is invalid")?,
    };
    Ok(registry)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to render output")
}
