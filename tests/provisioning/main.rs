mod configure;
mod user_agent;

use gxp_provision::{
    device::Device,
    provisioning::RawConfig,
    registry::{CapabilityRegistry, ConsistencyPolicy},
};
use serde_json::json;

pub fn registry() -> CapabilityRegistry {
    CapabilityRegistry::bundled(ConsistencyPolicy::Strict).expect("bundled registry loads")
}

pub fn device(model: &str) -> Device {
    serde_json::from_value(json!({
        "mac": "00:0B:82:46:2D:97",
        "vendor": "Grandstream",
        "model": model,
        "version": "1.0.11.48",
        "ip": "10.0.0.42"
    }))
    .expect("device should deserialize")
}

pub fn raw_config(overrides: serde_json::Value) -> RawConfig {
    let mut base = json!({
        "http_port": 8667,
        "sip_lines": {
            "1": {"username": "1001", "password": "autoprov", "display_name": "Alice"},
            "2": {"username": "1002", "password": "s3cret"}
        },
        "funckeys": {}
    });
    if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(base).expect("raw config should deserialize")
}
