use std::{collections::HashSet, fmt, fs, num::NonZeroU32, path::Path, sync::OnceLock};

use jsonschema::JSONSchema;
use serde::{
    Deserialize, Deserializer,
    de::{DeserializeOwned, IgnoredAny, MapAccess, Visitor},
};
use serde_json::Value;

use crate::descriptor::{
    error::{
        DescriptorError, duplicate_key, internal_error, invalid_field, io_error,
        schema_violation, syntax_error,
    },
    flag::Flag,
    types::Descriptor,
};

const DESCRIPTOR_SCHEMA: &str = include_str!("../../schemas/plugin-info.schema.json");

pub fn load_descriptor(path: &Path) -> Result<Descriptor, DescriptorError> {
    let text = fs::read_to_string(path)
        .map_err(|err| io_error(format!("failed to read {}: {err}", path.display())))?;
    parse_descriptor(&text)
}

/// Parses and validates a descriptor document.
///
/// Stages run in order and stop at the first failure: JSON syntax, duplicate capability
/// keys, schema, typed deserialization.
pub fn parse_descriptor(text: &str) -> Result<Descriptor, DescriptorError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| syntax_error(format!("descriptor is not valid JSON: {err}")))?;

    reject_duplicate_keys(text)?;
    validate_against_schema(&value)?;

    serde_json::from_str(text).map_err(|err| {
        let message = format!("invalid descriptor: {err}");
        match locate_unfit_field(&value) {
            Some(pointer) => invalid_field(format!("{pointer}: {message}")).with_field(pointer),
            None => invalid_field(message),
        }
    })
}

fn fits<T: DeserializeOwned>(value: &Value) -> bool {
    T::deserialize(value).is_ok()
}

/// JSON pointer of the first value the schema accepts but the typed model cannot hold,
/// e.g. a whole-number float where an integer is expected.
fn locate_unfit_field(value: &Value) -> Option<String> {
    if let Some(official) = value.get("vendor.official")
        && !fits::<Flag>(official)
    {
        return Some(format!("/{}", escape_pointer("vendor.official")));
    }

    let capabilities = value.get("capabilities")?.as_object()?;
    for (key, capability) in capabilities {
        let Some(attributes) = capability.as_object() else {
            return Some(format!("/capabilities/{}", escape_pointer(key)));
        };
        let checks: [(&str, fn(&Value) -> bool); 4] = [
            ("sip.lines", fits::<NonZeroU32>),
            ("xivo.ha", fits::<Flag>),
            ("tel.funckeys", fits::<u32>),
            ("xivo.tested", fits::<Flag>),
        ];
        let unfit = checks
            .into_iter()
            .find(|(name, fit)| attributes.get(*name).is_some_and(|attr| !fit(attr)));
        if let Some((name, _)) = unfit {
            return Some(format!(
                "/capabilities/{}/{}",
                escape_pointer(key),
                escape_pointer(name)
            ));
        }
    }
    None
}

fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn descriptor_schema() -> Result<&'static JSONSchema, DescriptorError> {
    static COMPILED: OnceLock<Result<JSONSchema, String>> = OnceLock::new();
    COMPILED
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(DESCRIPTOR_SCHEMA)
                .map_err(|err| format!("failed to parse descriptor schema: {err}"))?;
            JSONSchema::compile(&schema)
                .map_err(|err| format!("failed to compile descriptor schema: {err}"))
        })
        .as_ref()
        .map_err(|message| internal_error(message.clone()))
}

fn validate_against_schema(value: &Value) -> Result<(), DescriptorError> {
    let schema = descriptor_schema()?;
    let Err(errors) = schema.validate(value) else {
        return Ok(());
    };

    let violations: Vec<(String, String)> = errors
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let pointer = if pointer.is_empty() {
                "/".to_string()
            } else {
                pointer
            };
            (pointer, error.to_string())
        })
        .collect();

    let field = violations
        .first()
        .map(|(pointer, _)| pointer.clone())
        .unwrap_or_else(|| "/".to_string());
    let details: Vec<String> = violations
        .iter()
        .map(|(pointer, message)| format!("{pointer}: {message}"))
        .collect();

    Err(schema_violation(
        field,
        format!("descriptor validation failed: {}", details.join("; ")),
    ))
}

// serde_json::Value keeps the last of repeated keys, so duplicates are detected on the
// raw text. A missing or non-object `capabilities` is left for the schema to report.
fn reject_duplicate_keys(text: &str) -> Result<(), DescriptorError> {
    let Ok(CapabilityKeys {
        capabilities: Some(keys),
    }) = serde_json::from_str::<CapabilityKeys>(text)
    else {
        return Ok(());
    };

    let mut seen = HashSet::new();
    match keys.0.iter().find(|key| !seen.insert(key.as_str())) {
        Some(key) => Err(duplicate_key(key)),
        None => Ok(()),
    }
}

#[derive(Deserialize)]
struct CapabilityKeys {
    #[serde(default)]
    capabilities: Option<KeyList>,
}

struct KeyList(Vec<String>);

impl<'de> Deserialize<'de> for KeyList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(KeyListVisitor)
    }
}

struct KeyListVisitor;

impl<'de> Visitor<'de> for KeyListVisitor {
    type Value = KeyList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyList, A::Error> {
        let mut keys = Vec::new();
        while let Some(key) = map.next_key::<String>()? {
            map.next_value::<IgnoredAny>()?;
            keys.push(key);
        }
        Ok(KeyList(keys))
    }
}
