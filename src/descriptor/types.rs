use std::{collections::BTreeMap, fmt, num::NonZeroU32};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};
use serde_json::Value;

use crate::descriptor::flag::Flag;

/// A plugin descriptor: vendor metadata plus one capability record per supported model.
///
/// Keys this crate does not know about are kept in `extra` and written back on
/// serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_fr: Option<String>,
    pub vendor: String,
    #[serde(
        rename = "vendor.url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_url: Option<String>,
    #[serde(
        rename = "vendor.description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_description: Option<String>,
    #[serde(
        rename = "vendor.official",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_official: Option<Flag>,
    pub capabilities: CapabilityTable,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    #[serde(rename = "sip.lines")]
    pub sip_lines: NonZeroU32,
    #[serde(rename = "xivo.ha")]
    pub high_availability: Flag,
    #[serde(rename = "tel.funckeys")]
    pub funckeys: u32,
    #[serde(rename = "xivo.tested")]
    pub tested: Flag,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Capability records keyed by their opaque identifier.
///
/// Deserialization fails on a repeated key instead of keeping the last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityTable {
    entries: BTreeMap<String, Capability>,
}

impl CapabilityTable {
    pub fn get(&self, id: &str) -> Option<&Capability> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Capability)> {
        self.entries.iter().map(|(id, capability)| (id.as_str(), capability))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a record, refusing to replace an existing one.
    pub fn insert(&mut self, id: impl Into<String>, capability: Capability) -> Result<(), String> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(id);
        }
        self.entries.insert(id, capability);
        Ok(())
    }
}

impl Serialize for CapabilityTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}

impl<'de> Deserialize<'de> for CapabilityTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CapabilityTableVisitor)
    }
}

struct CapabilityTableVisitor;

impl<'de> Visitor<'de> for CapabilityTableVisitor {
    type Value = CapabilityTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from model identifier to capability record")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CapabilityTable, A::Error> {
        let mut table = CapabilityTable::default();
        while let Some((id, capability)) = map.next_entry::<String, Capability>()? {
            table.insert(id, capability).map_err(|id| {
                <A::Error as serde::de::Error>::custom(format!("duplicate capability key '{id}'"))
            })?;
        }
        Ok(table)
    }
}
