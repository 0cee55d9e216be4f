use super::entity::{take_en_aliases, take_vitals, truthy};
use super::scrub_bond_keys;
use crate::model::{Energy, StatValue, Vehicle, VehicleKind};
use crate::number::value_text;
use serde_json::{Map, Value};

/// Core fields models sometimes nest under `vehicle.stats` by mistake.
const CORE_FIELDS: &[&str] = &[
    "hp_curr", "hp_max", "mp_curr", "mp_max", "en", "en_curr", "en_max",
];

pub(crate) fn normalize_vehicle(mut m: Map<String, Value>) -> Vehicle {
    let active = truthy(m.remove("active").as_ref());
    let kind = m
        .remove("type")
        .map(|v| VehicleKind::parse(&value_text(&v)))
        .unwrap_or_default();

    hoist_core_fields(&mut m);
    let energy = vehicle_energy(&mut m, kind == VehicleKind::Ship);

    let mut vitals = take_vitals(&mut m, "Vehicle");
    vitals.energy = energy;
    scrub_bond_keys(&mut m);
    Vehicle {
        active,
        kind,
        vitals,
        extra: m,
    }
}

fn hoist_core_fields(m: &mut Map<String, Value>) {
    let Some(Value::Object(mut stats)) = m.remove("stats") else {
        return;
    };
    for key in CORE_FIELDS {
        if !m.contains_key(*key) {
            if let Some(v) = stats.remove(*key) {
                m.insert(key.to_string(), v);
            }
        }
    }
    m.insert("stats".to_string(), Value::Object(stats));
}

/// Ships store energy under `en_*`, other vehicles under `mp_*`; every alias
/// feeds the reading and the opposite scheme's keys are dropped.
fn vehicle_energy(m: &mut Map<String, Value>, ship: bool) -> Energy {
    let (en_curr, en_max) = take_en_aliases(m);
    let mp_alias = m.remove("mp").filter(|v| !v.is_null());
    let mp_curr = m.remove("mp_curr").filter(|v| !v.is_null()).or(mp_alias);
    let mp_max = m.remove("mp_max").filter(|v| !v.is_null());
    let to_stat = |v: Option<Value>| v.as_ref().and_then(StatValue::from_value);
    if ship {
        Energy {
            en_curr: to_stat(en_curr.or(mp_curr)),
            en_max: to_stat(en_max.or(mp_max)),
            ..Energy::default()
        }
    } else {
        Energy {
            mp_curr: to_stat(mp_curr.or(en_curr)),
            mp_max: to_stat(mp_max.or(en_max)),
            ..Energy::default()
        }
    }
}
