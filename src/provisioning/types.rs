use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

/// Vendor-neutral device configuration as produced by the provisioning server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
    #[serde(default)]
    pub sip_lines: BTreeMap<String, SipLine>,
    #[serde(default)]
    pub funckeys: BTreeMap<String, FuncKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sip_dtmf_mode: Option<DtmfMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sip_transport: Option<SipTransport>,
    #[serde(default)]
    pub dns_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_ip: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SipLine {
    #[serde(default)]
    pub password: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncKey {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_line_number")]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub value: String,
}

fn deserialize_line_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LineNumber {
        Number(u32),
        Text(String),
    }

    let line = match LineNumber::deserialize(deserializer)? {
        LineNumber::Number(line) => line,
        LineNumber::Text(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| D::Error::custom(format!("line '{text}' is not a line number")))?,
    };
    if line == 0 {
        return Err(D::Error::custom("line numbers start at 1"));
    }
    Ok(line)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuncKeyType {
    Speeddial,
    Blf,
    Park,
    Default,
    Disabled,
}

impl FuncKeyType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "speeddial" => Some(Self::Speeddial),
            "blf" => Some(Self::Blf),
            "park" => Some(Self::Park),
            "default" => Some(Self::Default),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }

    /// Key mode value understood by the phone.
    pub fn code(self) -> i32 {
        match self {
            Self::Speeddial => 0,
            Self::Blf => 1,
            Self::Park => 9,
            Self::Default => 31,
            Self::Disabled => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtmfMode {
    #[serde(rename = "RTP-in-band")]
    RtpInBand,
    #[serde(rename = "RTP-out-of-band")]
    RtpOutOfBand,
    #[serde(rename = "SIP-INFO")]
    SipInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DtmfSettings {
    pub in_audio: bool,
    pub in_rtp: bool,
    pub in_sip: bool,
}

impl DtmfMode {
    pub fn settings(self) -> DtmfSettings {
        let (in_audio, in_rtp, in_sip) = match self {
            Self::RtpInBand => (true, true, false),
            Self::RtpOutOfBand => (false, true, false),
            Self::SipInfo => (false, false, true),
        };
        DtmfSettings {
            in_audio,
            in_rtp,
            in_sip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SipTransport {
    Udp,
    Tcp,
    Tls,
}

impl SipTransport {
    pub fn device_value(self) -> &'static str {
        match self {
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
            Self::Tls => "TlsOrTcp",
        }
    }
}

/// One numbered Grandstream parameter, e.g. `P323 = 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PValue {
    pub code: String,
    pub value: Value,
}

impl PValue {
    pub fn new(number: u32, value: impl Into<Value>) -> Self {
        Self {
            code: format!("P{number}"),
            value: value.into(),
        }
    }
}
