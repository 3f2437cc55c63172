use gxp_provision::{
    device::{Device, extract_device_info},
    provisioning::{ProvisioningSettings, configure},
};
use serde_json::json;

use crate::{raw_config, registry};

#[test]
fn given_phone_user_agent_when_identified_then_device_can_be_configured() {
    let info =
        extract_device_info("Grandstream Model HW GXP2170 V1.2A SW 1.0.11.48 DevId 000B82ABCDEF")
            .expect("user agent should be recognized");
    assert_eq!(info.mac.to_string(), "00:0b:82:ab:cd:ef");

    let registry = registry();
    assert!(registry.capability_for_model(&info.model).is_some());

    let plan = configure(
        &registry,
        &ProvisioningSettings::default(),
        &Device::from(info),
        &raw_config(json!({})),
    )
    .expect("configuration should succeed");
    assert_eq!(plan.filename, "cfg000b82abcdef.xml");
    assert_eq!(plan.model.as_deref(), Some("GXP2170"));
}

#[test]
fn given_other_vendor_user_agent_when_identified_then_nothing_is_returned() {
    assert!(extract_device_info("Mozilla/5.0 (X11; Linux x86_64)").is_none());
}
