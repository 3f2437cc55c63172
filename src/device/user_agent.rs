use std::sync::LazyLock;

use regex::Regex;

use crate::device::{mac::MacAddress, types::DeviceInfo};

const VENDOR: &str = "Grandstream";

// Grandstream Model HW GXP2200 V2.2A SW 1.0.1.33 DevId 000b82462d97
// Grandstream GXP2000 (gxp2000e.bin:1.2.5.3/boot55e.bin:1.1.6.9) DevId 000b822726c8
static USER_AGENT_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^Grandstream Model HW (\w+)(?: V[^ ]+)? SW ([^ ]+) DevId ([^ ]+)")
            .expect("model user agent pattern is valid"),
        Regex::new(r"^Grandstream (GXP2000) .*:([^ ]+)\) DevId ([^ ]+)")
            .expect("legacy user agent pattern is valid"),
    ]
});

/// Identifies a Grandstream phone from the `User-Agent` header of its HTTP requests.
pub fn extract_device_info(user_agent: &str) -> Option<DeviceInfo> {
    for pattern in USER_AGENT_PATTERNS.iter() {
        let Some(captures) = pattern.captures(user_agent) else {
            continue;
        };
        let (_, [model, version, raw_mac]) = captures.extract();

        match raw_mac.parse::<MacAddress>() {
            Ok(mac) => {
                return Some(DeviceInfo {
                    vendor: VENDOR.to_string(),
                    model: model.to_string(),
                    version: version.to_string(),
                    mac,
                });
            }
            Err(err) => {
                tracing::warn!(
                    target: "device",
                    user_agent = %user_agent,
                    error = %err,
                    "user_agent_mac_rejected"
                );
            }
        }
    }
    None
}
