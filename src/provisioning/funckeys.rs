use std::collections::BTreeMap;

use crate::{
    descriptor::Capability,
    provisioning::{
        error::{ProvisioningError, invalid_field},
        types::{FuncKey, FuncKeyType, PValue},
    },
};

/// How a model numbers the parameters of its multi-purpose keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpkLayout {
    /// Three parameter banks: keys 1-7, 8-18 and 19 onwards.
    Banked,
    /// One contiguous block of five parameters per key.
    Linear,
    /// The model has programmable keys but none are provisioned through P-values.
    NotProvisioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpkSlot {
    pub mode: u32,
    pub account: u32,
    pub name: u32,
    pub value: u32,
}

pub fn mpk_layout(model: &str) -> Option<MpkLayout> {
    match model {
        "GXP2130" | "GXP2160" => Some(MpkLayout::Banked),
        "GXP2140" | "GXP2170" => Some(MpkLayout::Linear),
        "GXP2135" => Some(MpkLayout::NotProvisioned),
        _ => None,
    }
}

impl MpkLayout {
    /// Parameter numbers for key `key`, counted from 1. `None` when the model provisions
    /// no keys or the numbers would not fit a `u32`.
    pub fn slot(self, key: u32) -> Option<MpkSlot> {
        match (self, key) {
            (_, 0) | (MpkLayout::NotProvisioned, _) => None,
            (MpkLayout::Banked, 1..=7) => {
                let step = key - 1;
                Some(MpkSlot {
                    mode: 323 + step,
                    account: 301 + 3 * step,
                    name: 302 + 3 * step,
                    value: 303 + 3 * step,
                })
            }
            (MpkLayout::Banked, 8..=18) => block(353, (key - 8) * 4),
            (MpkLayout::Banked, _) => block(1440, (key - 19).checked_mul(4)?),
            (MpkLayout::Linear, _) => block(23000, (key - 1).checked_mul(5)?),
        }
    }
}

fn block(base: u32, step: u32) -> Option<MpkSlot> {
    let first = base.checked_add(step)?;
    first.checked_add(3)?;
    Some(MpkSlot {
        mode: first,
        account: first + 1,
        name: first + 2,
        value: first + 3,
    })
}

/// Builds the MPK parameters for `funckeys`, in ascending key order.
///
/// Two entries naming the same key number (`"1"` and `"01"`) are rejected. Keys beyond
/// the model's `tel.funckeys` capability, keys whose parameter numbers overflow and keys
/// of an unknown type are skipped. A model missing from the registry or without a known
/// layout gets no MPK parameters at all.
pub fn build_mpk_params(
    model: Option<&str>,
    capability: Option<&Capability>,
    funckeys: &BTreeMap<String, FuncKey>,
) -> Result<Vec<PValue>, ProvisioningError> {
    let mut ordered = Vec::with_capacity(funckeys.len());
    for (raw_number, funckey) in funckeys {
        let number: u32 = raw_number
            .trim()
            .parse()
            .ok()
            .filter(|number| *number > 0)
            .ok_or_else(|| invalid_field(format!("funckey '{raw_number}' is not a key number")))?;
        ordered.push((number, raw_number.as_str(), funckey));
    }
    ordered.sort_by_key(|(number, _, _)| *number);
    if let Some(pair) = ordered.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(invalid_field(format!(
            "funckeys '{}' and '{}' both name key {}",
            pair[0].1, pair[1].1, pair[0].0
        )));
    }

    if ordered.is_empty() {
        return Ok(Vec::new());
    }
    let Some(model) = model else {
        tracing::warn!(target: "provisioning", "mpk_model_unknown");
        return Ok(Vec::new());
    };
    let (Some(capability), Some(layout)) = (capability, mpk_layout(model)) else {
        tracing::error!(target: "provisioning", model = %model, "mpk_model_unsupported");
        return Ok(Vec::new());
    };

    let mut params = Vec::new();
    for (number, _, funckey) in ordered {
        if number > capability.funckeys {
            tracing::debug!(
                target: "provisioning",
                model = %model,
                key = number,
                limit = capability.funckeys,
                "mpk_key_beyond_capability"
            );
            continue;
        }
        let Some(kind) = FuncKeyType::from_name(&funckey.kind) else {
            tracing::info!(
                target: "provisioning",
                key = number,
                kind = %funckey.kind,
                "mpk_key_type_unsupported"
            );
            continue;
        };
        let Some(slot) = layout.slot(number) else {
            if layout != MpkLayout::NotProvisioned {
                tracing::warn!(
                    target: "provisioning",
                    model = %model,
                    key = number,
                    "mpk_key_out_of_parameter_range"
                );
            }
            continue;
        };

        params.push(PValue::new(slot.mode, kind.code()));
        params.push(PValue::new(slot.account, funckey.line - 1));
        if let Some(label) = &funckey.label {
            params.push(PValue::new(slot.name, label.as_str()));
        }
        params.push(PValue::new(slot.value, funckey.value.as_str()));
    }
    Ok(params)
}
