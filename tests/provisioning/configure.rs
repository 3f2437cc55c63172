use gxp_provision::{
    provisioning::{DtmfSettings, PValue, ProvisioningErrorKind, ProvisioningSettings, configure},
    registry::{CapabilityRegistry, ConsistencyPolicy},
};
use serde_json::json;

use crate::{device, raw_config, registry};

fn codes(params: &[PValue]) -> Vec<&str> {
    params.iter().map(|param| param.code.as_str()).collect()
}

#[test]
fn given_minimal_config_when_configured_then_defaults_apply() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw_config(json!({})),
    )
    .expect("configuration should succeed");

    assert_eq!(plan.filename, "cfg000b82462d97.xml");
    assert_eq!(plan.mac, "000b82462d97");
    assert_eq!(plan.model.as_deref(), Some("GXP2160"));
    assert_eq!(plan.timezone, "CET-1CEST-2,M3.5.0/02:00:00,M10.5.0/03:00:00");
    assert_eq!(plan.locale, None);
    assert_eq!(plan.sip_transport, None);
    assert_eq!(plan.dtmf, None);
    assert_eq!(plan.dns, None);
    assert!(plan.mpk.is_empty());
}

#[test]
fn given_autoprov_password_when_configured_then_it_is_blanked() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw_config(json!({})),
    )
    .expect("configuration should succeed");

    assert_eq!(plan.sip_lines["1"].password, "");
    assert_eq!(plan.sip_lines["1"].extra.get("display_name"), Some(&json!("Alice")));
    assert_eq!(plan.sip_lines["2"].password, "s3cret");
}

#[test]
fn given_transport_locale_dtmf_and_dns_when_configured_then_device_values_are_derived() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2170"),
        &raw_config(json!({
            "sip_transport": "tls",
            "locale": "fr_CA",
            "timezone": "America/Nowhere",
            "sip_dtmf_mode": "RTP-in-band",
            "dns_enabled": true,
            "dns_ip": "192.168.1.53"
        })),
    )
    .expect("configuration should succeed");

    assert_eq!(plan.sip_transport.as_deref(), Some("TlsOrTcp"));
    assert_eq!(plan.locale.as_deref(), Some("fr"));
    assert_eq!(plan.timezone, "CET-1CEST-2,M3.5.0/02:00:00,M10.5.0/03:00:00");
    assert_eq!(
        plan.dtmf,
        Some(DtmfSettings {
            in_audio: true,
            in_rtp: true,
            in_sip: false,
        })
    );
    assert_eq!(plan.dns, Some([192, 168, 1, 53]));
}

#[test]
fn given_banked_model_when_configured_then_mpk_codes_follow_each_bank() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw_config(json!({
            "funckeys": {
                "19": {"type": "park", "line": 1, "value": "700"},
                "2": {"type": "blf", "line": "2", "label": "Bob", "value": "1002"},
                "8": {"type": "speeddial", "line": 1, "value": "*98"}
            }
        })),
    )
    .expect("configuration should succeed");

    assert_eq!(
        codes(&plan.mpk),
        vec![
            "P324", "P304", "P305", "P306", // key 2
            "P353", "P354", "P356", // key 8, no label
            "P1440", "P1441", "P1443", // key 19, no label
        ]
    );
    assert_eq!(plan.mpk[0].value, json!(1));
    assert_eq!(plan.mpk[1].value, json!(1));
    assert_eq!(plan.mpk[2].value, json!("Bob"));
    assert_eq!(plan.mpk[3].value, json!("1002"));
    assert_eq!(plan.mpk[4].value, json!(0));
    assert_eq!(plan.mpk[7].value, json!(9));
}

#[test]
fn given_keys_beyond_model_capability_when_configured_then_they_are_skipped() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2130"),
        &raw_config(json!({
            "funckeys": {
                "8": {"type": "blf", "line": 1, "value": "1008"},
                "9": {"type": "blf", "line": 1, "value": "1009"},
                "24": {"type": "blf", "line": 1, "value": "1024"}
            }
        })),
    )
    .expect("configuration should succeed");

    assert_eq!(codes(&plan.mpk), vec!["P353", "P354", "P356"]);
}

#[test]
fn given_linear_model_when_configured_then_five_parameter_blocks_are_used() {
    let plan = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2140"),
        &raw_config(json!({
            "funckeys": {
                "1": {"type": "default", "line": 1, "value": ""},
                "3": {"type": "disabled", "line": 2, "value": ""}
            }
        })),
    )
    .expect("configuration should succeed");

    assert_eq!(
        codes(&plan.mpk),
        vec!["P23000", "P23001", "P23003", "P23010", "P23011", "P23013"]
    );
    assert_eq!(plan.mpk[0].value, json!(31));
    assert_eq!(plan.mpk[3].value, json!(-1));
    assert_eq!(plan.mpk[4].value, json!(1));
}

#[test]
fn given_unsupported_key_type_or_model_when_configured_then_no_parameters_are_emitted() {
    let funckeys = json!({
        "funckeys": {"1": {"type": "paging", "line": 1, "value": "*11"}}
    });

    for model in ["GXP2160", "GXP2135", "GXP1405"] {
        let plan = configure(
            &registry(),
            &ProvisioningSettings::default(),
            &device(model),
            &raw_config(funckeys.clone()),
        )
        .expect("configuration should succeed");
        assert!(plan.mpk.is_empty(), "{model} produced {:?}", plan.mpk);
    }
}

#[test]
fn given_config_without_http_port_when_configured_then_it_is_refused() {
    let mut raw = raw_config(json!({}));
    raw.http_port = None;

    let err = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw,
    )
    .expect_err("HTTP-less config must fail");
    assert_eq!(err.kind, ProvisioningErrorKind::UnsupportedConfig);
}

#[test]
fn given_device_without_mac_when_configured_then_it_is_refused() {
    let mut device = device("GXP2160");
    device.mac = None;

    let err = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device,
        &raw_config(json!({})),
    )
    .expect_err("MAC-less device must fail");
    assert_eq!(err.kind, ProvisioningErrorKind::InvalidDevice);
}

#[test]
fn given_dns_enabled_without_valid_address_when_configured_then_field_is_rejected() {
    for overrides in [
        json!({"dns_enabled": true}),
        json!({"dns_enabled": true, "dns_ip": "10.0.0"}),
    ] {
        let err = configure(
            &registry(),
            &ProvisioningSettings::default(),
            &device("GXP2160"),
            &raw_config(overrides),
        )
        .expect_err("invalid DNS must fail");
        assert_eq!(err.kind, ProvisioningErrorKind::InvalidField);
        assert!(err.message.contains("dns_ip"), "unexpected error: {err}");
    }
}

#[test]
fn given_non_numeric_funckey_number_when_configured_then_field_is_rejected() {
    let err = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw_config(json!({
            "funckeys": {"first": {"type": "blf", "line": 1, "value": "1001"}}
        })),
    )
    .expect_err("non-numeric key must fail");
    assert_eq!(err.kind, ProvisioningErrorKind::InvalidField);
}

#[test]
fn given_two_spellings_of_one_key_number_when_configured_then_field_is_rejected() {
    let err = configure(
        &registry(),
        &ProvisioningSettings::default(),
        &device("GXP2160"),
        &raw_config(json!({
            "funckeys": {
                "1": {"type": "speeddial", "line": 1, "value": "1001"},
                "01": {"type": "blf", "line": 1, "value": "1002"}
            }
        })),
    )
    .expect_err("repeated key number must fail");
    assert_eq!(err.kind, ProvisioningErrorKind::InvalidField);
    assert!(err.message.contains("key 1"), "unexpected error: {err}");
}

#[test]
fn given_key_number_past_parameter_range_when_configured_then_it_is_skipped() {
    let text = r#"{
        "version": "1.0.11.48",
        "description": "huge key count",
        "vendor": "Grandstream",
        "capabilities": {
            "Grandstream, GXP2170, 1.0.11.48": {"sip.lines": 12, "xivo.ha": 1, "tel.funckeys": 4294967295, "xivo.tested": 1}
        }
    }"#;
    let registry = CapabilityRegistry::from_json_str(text, ConsistencyPolicy::Strict)
        .expect("descriptor is valid");

    let plan = configure(
        &registry,
        &ProvisioningSettings::default(),
        &device("GXP2170"),
        &raw_config(json!({
            "funckeys": {
                "1": {"type": "speeddial", "line": 1, "value": "1001"},
                "900000000": {"type": "speeddial", "line": 1, "value": "1002"}
            }
        })),
    )
    .expect("configuration should succeed");

    assert_eq!(codes(&plan.mpk), vec!["P23000", "P23001", "P23003"]);
}
