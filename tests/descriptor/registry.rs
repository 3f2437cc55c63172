use std::{sync::Arc, thread};

use gxp_provision::{
    descriptor::{DescriptorErrorKind, Flag},
    registry::{CapabilityRegistry, ConsistencyPolicy, ModelKey},
};

use crate::GXP2160;

fn bundled() -> CapabilityRegistry {
    CapabilityRegistry::bundled(ConsistencyPolicy::Strict).expect("bundled registry loads")
}

#[test]
fn given_gxp2160_identifier_when_looked_up_then_capability_matches() {
    let registry = bundled();
    let capability = registry.lookup(GXP2160).expect("GXP2160 is registered");

    assert_eq!(capability.sip_lines.get(), 6);
    assert_eq!(capability.high_availability, Flag::ON);
    assert_eq!(capability.funckeys, 24);
    assert_eq!(capability.tested, Flag::OFF);
}

#[test]
fn given_absent_identifier_when_looked_up_then_not_found_is_signalled() {
    let registry = bundled();
    let absent = "Grandstream, GXP9999, 1.0.11.48";

    assert!(registry.get(absent).is_none());
    let err = registry.lookup(absent).expect_err("absent model must not resolve");
    assert_eq!(err.kind, DescriptorErrorKind::NotFound);
    assert_eq!(err.field.as_deref(), Some(absent));
}

#[test]
fn given_model_name_when_looked_up_then_descriptor_vendor_and_version_are_used() {
    let registry = bundled();
    let by_model = registry.capability_for_model("GXP2160").expect("model resolves");
    let by_parts = registry
        .lookup_model("Grandstream", "GXP2160", "1.0.11.48")
        .expect("parts resolve");

    assert_eq!(by_model, by_parts);
    assert!(registry.capability_for_model("GXP9999").is_none());
    assert!(registry.lookup_model("Grandstream", "GXP2160", "1.0.9.135").is_none());
}

#[test]
fn given_bundled_registry_then_keys_are_unique_and_parse_as_model_keys() {
    let registry = bundled();
    let keys = registry.model_keys();

    assert_eq!(keys.len(), registry.len());
    let mut models: Vec<&str> = keys.iter().map(|key| key.model.as_str()).collect();
    models.sort_unstable();
    models.dedup();
    assert_eq!(models, vec!["GXP2130", "GXP2135", "GXP2140", "GXP2160", "GXP2170"]);
    assert!(keys.contains(&ModelKey::new("Grandstream", "GXP2170", "1.0.11.48")));
}

#[test]
fn given_mismatched_vendor_when_strict_then_load_is_refused() {
    let text = r#"{
        "version": "1.0.11.48",
        "description": "wrong vendor",
        "vendor": "Grandstream",
        "capabilities": {
            "Yealink, T46G, 1.0.11.48": {"sip.lines": 6, "xivo.ha": 1, "tel.funckeys": 27, "xivo.tested": 0}
        }
    }"#;

    let err = CapabilityRegistry::from_json_str(text, ConsistencyPolicy::Strict)
        .expect_err("strict policy must refuse");
    assert_eq!(err.kind, DescriptorErrorKind::Inconsistent);
    assert!(err.message.contains("Yealink"), "unexpected error: {err}");

    let lenient = CapabilityRegistry::from_json_str(text, ConsistencyPolicy::Warn)
        .expect("warn policy loads");
    assert!(lenient.get("Yealink, T46G, 1.0.11.48").is_some());
}

#[test]
fn given_shared_registry_when_read_concurrently_then_every_reader_sees_same_data() {
    let registry = Arc::new(bundled());

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .iter()
                    .map(|(_, capability)| capability.funckeys)
                    .sum::<u32>()
            })
        })
        .collect();

    for reader in readers {
        assert_eq!(reader.join().expect("reader should not panic"), 8 + 32 + 160 + 24 + 160);
    }
}

#[test]
fn given_summary_then_flags_are_reported_as_booleans() {
    let summary = bundled().summary();
    assert_eq!(summary.vendor, "Grandstream");
    assert_eq!(summary.version, "1.0.11.48");

    let gxp2160 = summary
        .models
        .iter()
        .find(|model| model.id == GXP2160)
        .expect("summary lists GXP2160");
    assert_eq!(gxp2160.sip_lines, 6);
    assert!(gxp2160.high_availability);
    assert!(!gxp2160.tested);
}

#[test]
fn given_loosely_spaced_key_when_model_is_looked_up_then_it_is_found() {
    let text = r#"{
        "version": "1.0.11.48",
        "description": "compact keys",
        "vendor": "Grandstream",
        "capabilities": {
            "Grandstream,GXP2130,1.0.11.48": {"sip.lines": 3, "xivo.ha": 1, "tel.funckeys": 8, "xivo.tested": 1}
        }
    }"#;

    let registry = CapabilityRegistry::from_json_str(text, ConsistencyPolicy::Strict)
        .expect("compact keys are consistent");
    let capability = registry
        .capability_for_model("GXP2130")
        .expect("compact key must resolve");
    assert_eq!(capability.funckeys, 8);
    assert!(registry.get("Grandstream, GXP2130, 1.0.11.48").is_none());
    assert!(registry.capability_for_model("GXP2170").is_none());
}
