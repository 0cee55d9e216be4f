use super::bond::resolve_bond;
use super::vehicle::normalize_vehicle;
use crate::model::{Energy, Entity, EntityKind, ListEntry, Meter, StatValue, Stats, Vitals};
use crate::number::{number_or, value_text};
use crate::options::Options;
use serde_json::{Map, Value};

pub(crate) fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn merge(template: &Map<String, Value>, input: &Map<String, Value>) -> Map<String, Value> {
    let mut out = template.clone();
    for (k, v) in input {
        out.insert(k.clone(), v.clone());
    }
    out
}

pub(crate) fn normalize_entity(
    input: &Map<String, Value>,
    template: &Map<String, Value>,
    kind: EntityKind,
    opts: &Options,
) -> Entity {
    let mut m = merge(template, input);
    let bond = resolve_bond(input, &mut m, opts);
    let vehicle = match m.remove("vehicle") {
        Some(Value::Object(v)) => Some(normalize_vehicle(v)),
        _ => None,
    };
    let energy = entity_energy(input, &mut m);
    let default_name = match kind {
        EntityKind::Player => "{{user}}",
        _ => "Unit",
    };
    let mut vitals = take_vitals(&mut m, default_name);
    vitals.energy = energy;
    Entity {
        kind,
        vitals,
        bond,
        vehicle,
        extra: m,
    }
}

/// Characters and creatures keep energy under `mp_*`. When the model only
/// wrote `en`-style keys those are folded in instead of the template's zeros.
fn entity_energy(input: &Map<String, Value>, m: &mut Map<String, Value>) -> Energy {
    let has_mp = ["mp_curr", "mp_max", "mp"]
        .iter()
        .any(|k| input.contains_key(*k));
    let (en_curr, en_max) = take_en_aliases(m);
    let mp_alias = m.remove("mp");
    let mp_curr = m.remove("mp_curr");
    let mp_max = m.remove("mp_max");
    let (curr, max) = if has_mp {
        (non_null(mp_curr).or(mp_alias), mp_max)
    } else {
        (
            en_curr.or(mp_alias).or(mp_curr),
            en_max.or(mp_max),
        )
    };
    Energy {
        mp_curr: Some(StatValue::from_opt(curr)),
        mp_max: Some(StatValue::from_opt(max)),
        ..Energy::default()
    }
}

fn non_null(v: Option<Value>) -> Option<Value> {
    v.filter(|v| !v.is_null())
}

/// Removes every `en` spelling and returns the first current/max found.
pub(crate) fn take_en_aliases(m: &mut Map<String, Value>) -> (Option<Value>, Option<Value>) {
    let curr = first_of(m, &["en_curr", "en", "en_current"]);
    let max = first_of(m, &["en_max", "enMax", "en_capacity"]);
    (curr, max)
}

fn first_of(m: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for k in keys {
        if let Some(v) = non_null(m.remove(*k)) {
            found.get_or_insert(v);
        }
    }
    found
}

/// Pulls the shared combatant fields out of `m`, leaving unknown keys behind.
pub(crate) fn take_vitals(m: &mut Map<String, Value>, default_name: &str) -> Vitals {
    let name = match m.remove("name") {
        Some(Value::Null) | None => default_name.to_string(),
        Some(v) => {
            let s = value_text(&v).into_owned();
            if s.is_empty() {
                default_name.to_string()
            } else {
                s
            }
        }
    };
    let hp_curr = StatValue::from_opt(m.remove("hp_curr"));
    let hp_max = StatValue::from_opt(m.remove("hp_max"));
    let meters = resolve_meters(m);
    let stats = resolve_stats(m.remove("stats"));

    let inventory = ListEntry::list_from(m.remove("inventory"));
    let skills = ListEntry::list_from(m.remove("skills"));
    let passives = ListEntry::list_from(m.remove("passives"));
    let masteries = ListEntry::list_from(m.remove("masteries"));
    let status_effects = ListEntry::list_from(m.remove("status_effects"));
    let legacy_status = ListEntry::list_from(m.remove("status"));
    let status_effects = if status_effects.is_empty() {
        legacy_status
    } else {
        status_effects
    };

    let currency = number_or(m.remove("dankcoin").as_ref(), 0.0);

    Vitals {
        name,
        hp_curr,
        hp_max,
        energy: Energy::default(),
        meters,
        stats,
        inventory,
        skills,
        passives,
        masteries,
        status_effects,
        currency,
    }
}

/// Five canonical stats, with `extra_1`/`extra_2` migrated to `satk`/`sdef`.
pub(crate) fn resolve_stats(v: Option<Value>) -> Stats {
    let mut s = match v {
        Some(Value::Object(s)) => s,
        _ => Map::new(),
    };
    let extra_1 = s.remove("extra_1");
    let extra_2 = s.remove("extra_2");
    let atk = StatValue::from_opt(s.remove("atk"));
    let matk = StatValue::from_opt(s.remove("matk"));
    let def = StatValue::from_opt(s.remove("def"));
    let satk = StatValue::from_opt(s.remove("satk").or(extra_1));
    let sdef = StatValue::from_opt(s.remove("sdef").or(extra_2));
    Stats {
        atk,
        matk,
        def,
        satk,
        sdef,
        extra: s,
    }
}

/// Normalized `meters`, or meters synthesized from a legacy `survival` map
/// when none are left. `survival` is always removed.
pub(crate) fn resolve_meters(m: &mut Map<String, Value>) -> Vec<Meter> {
    let mut meters = normalize_meters(m.remove("meters"));
    let survival = m.remove("survival");
    if meters.is_empty() {
        if let Some(Value::Object(survival)) = survival {
            meters = survival
                .into_iter()
                .filter(|(k, _)| !k.is_empty())
                .map(|(k, v)| Meter {
                    name: k,
                    curr: StatValue::from_opt(Some(v)),
                    max: StatValue::from(100),
                })
                .collect();
        }
    }
    meters
}

pub(crate) fn normalize_meters(v: Option<Value>) -> Vec<Meter> {
    let Some(Value::Array(entries)) = v else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| {
            let Value::Object(mut e) = entry else {
                return None;
            };
            let name = non_null(e.remove("name")).or_else(|| non_null(e.remove("label")))?;
            let name = value_text(&name).into_owned();
            if name.is_empty() {
                return None;
            }
            let curr = non_null(e.remove("curr")).or_else(|| non_null(e.remove("value")));
            let max = non_null(e.remove("max")).unwrap_or(Value::from(100));
            Some(Meter {
                name,
                curr: StatValue::from_opt(curr),
                max: StatValue::from_opt(Some(max)),
            })
        })
        .collect()
}
