use std::{collections::BTreeMap, net::Ipv4Addr};

use serde::Serialize;

use crate::{
    device::{Device, MacAddress},
    provisioning::{
        error::{ProvisioningError, invalid_device, invalid_field, unsupported_config},
        funckeys::build_mpk_params,
        settings::ProvisioningSettings,
        types::{DtmfMode, DtmfSettings, PValue, RawConfig, SipLine},
    },
    registry::CapabilityRegistry,
};

const AUTOPROV_PASSWORD: &str = "autoprov";

/// Grandstream-specific parameters derived from one device and its raw configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisioningPlan {
    pub filename: String,
    pub mac: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sip_transport: Option<String>,
    pub timezone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtmf: Option<DtmfSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns: Option<[u8; 4]>,
    pub sip_lines: BTreeMap<String, SipLine>,
    pub mpk: Vec<PValue>,
}

pub fn config_filename(mac: &MacAddress) -> String {
    format!("cfg{}.xml", mac.format("", false))
}

pub fn configure(
    registry: &CapabilityRegistry,
    settings: &ProvisioningSettings,
    device: &Device,
    raw_config: &RawConfig,
) -> Result<ProvisioningPlan, ProvisioningError> {
    if raw_config.http_port.is_none() {
        return Err(unsupported_config(
            "only configuration via HTTP is supported: http_port is missing",
        ));
    }
    let mac = device
        .mac
        .ok_or_else(|| invalid_device("MAC address needed for device configuration"))?;

    let model = device.model.as_deref();
    let capability = model.and_then(|model| registry.capability_for_model(model));
    if let Some(capability) = capability
        && raw_config.sip_lines.len() > capability.sip_lines.get() as usize
    {
        tracing::warn!(
            target: "provisioning",
            model = model.unwrap_or_default(),
            configured = raw_config.sip_lines.len(),
            supported = capability.sip_lines.get(),
            "sip_lines_exceed_capability"
        );
    }

    let plan = ProvisioningPlan {
        filename: config_filename(&mac),
        mac: mac.format("", false),
        model: model.map(str::to_string),
        sip_transport: raw_config
            .sip_transport
            .map(|transport| transport.device_value().to_string()),
        timezone: settings
            .timezone_for(raw_config.timezone.as_deref())
            .to_string(),
        locale: raw_config
            .locale
            .as_deref()
            .and_then(|locale| settings.language_for(locale))
            .map(str::to_string),
        dtmf: raw_config.sip_dtmf_mode.map(DtmfMode::settings),
        dns: dns_octets(raw_config)?,
        sip_lines: normalize_line_passwords(&raw_config.sip_lines),
        mpk: build_mpk_params(model, capability, &raw_config.funckeys)?,
    };

    tracing::info!(
        target: "provisioning",
        mac = %mac,
        model = model.unwrap_or_default(),
        filename = %plan.filename,
        mpk_params = plan.mpk.len(),
        "device_configured"
    );
    Ok(plan)
}

// Auto-provisioned lines carry a placeholder password the phone must not send.
fn normalize_line_passwords(lines: &BTreeMap<String, SipLine>) -> BTreeMap<String, SipLine> {
    lines
        .iter()
        .map(|(number, line)| {
            let mut line = line.clone();
            if line.password == AUTOPROV_PASSWORD {
                line.password.clear();
            }
            (number.clone(), line)
        })
        .collect()
}

fn dns_octets(raw_config: &RawConfig) -> Result<Option<[u8; 4]>, ProvisioningError> {
    if !raw_config.dns_enabled {
        return Ok(None);
    }
    let raw_ip = raw_config
        .dns_ip
        .as_deref()
        .ok_or_else(|| invalid_field("dns_ip is required when dns_enabled is set"))?;
    let ip: Ipv4Addr = raw_ip
        .trim()
        .parse()
        .map_err(|_| invalid_field(format!("dns_ip '{raw_ip}' is not an IPv4 address")))?;
    Ok(Some(ip.octets()))
}
