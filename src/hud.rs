//! Display-ready view of the state: gauge bars, inline values, roster labels.
//! Nothing here renders markup; a front end turns these records into widgets.

use crate::model::{Entity, EntityKind, EnergyLabel, Meter, RpgState, StatValue, VehicleKind};
use crate::number::{parse_or_infinity, percent};
use crate::options::{Options, UnboundedMeter};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub curr: String,
    pub max: String,
    /// Fill in `[0, 100]`.
    pub percent: f64,
    pub color: &'static str,
}

/// Meters worth drawing. A finite maximum at or below zero hides the meter;
/// an infinite maximum follows [`Options::unbounded_meter`].
pub fn visible_meters(meters: &[Meter], opts: &Options) -> Vec<Bar> {
    meters
        .iter()
        .filter(|m| {
            let max = parse_or_infinity(&m.max.text(), 0.0);
            if max.is_finite() {
                max > 0.0
            } else {
                opts.unbounded_meter == UnboundedMeter::Full
            }
        })
        .map(|m| bar(&m.name, &m.curr, &m.max, meter_color(&m.name)))
        .collect()
}

fn bar(label: &str, curr: &StatValue, max: &StatValue, color: &'static str) -> Bar {
    let curr = curr.text();
    let max = max.text();
    Bar {
        label: label.to_string(),
        percent: percent(&curr, &max),
        curr: curr.into_owned(),
        max: max.into_owned(),
        color,
    }
}

/// Colour for a meter, picked from words in its name.
pub fn meter_color(name: &str) -> &'static str {
    let k = name.to_lowercase();
    let has = |w: &str| k.contains(w);
    if has("shield") || has("barrier") {
        "#00bcd4"
    } else if has("temp") && has("hp") {
        "#ff9800"
    } else if has("stamina") || has("energy") {
        "#ffd54f"
    } else if has("sanity") || has("mind") {
        "#64b5f6"
    } else if has("hunger") || has("food") {
        "#81c784"
    } else if has("thirst") || has("water") {
        "#4dd0e1"
    } else if has("heat") || has("temp") {
        "#ff7043"
    } else if has("corrupt") || has("taint") {
        "#ba68c8"
    } else if has("rad") || has("toxin") || has("poison") {
        "#cddc39"
    } else {
        "#26a69a"
    }
}

/// A stat split into what is shown and the working behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineValue<'a> {
    pub shown: Cow<'a, str>,
    pub formula: Option<&'a str>,
}

pub fn inline_value(v: &StatValue) -> InlineValue<'_> {
    let (shown, formula) = v.split_formula();
    InlineValue { shown, formula }
}

/// Gauges for one selected entity, reading from its active vehicle when it
/// is driving one.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub name: String,
    pub hp: Bar,
    pub energy: Bar,
    pub meters: Vec<Bar>,
    pub in_vehicle: bool,
}

pub fn entity_view(entity: &Entity, opts: &Options) -> EntityView {
    let vitals = entity.display_vitals();
    let energy = entity.display_energy();
    let energy_color = match energy.label {
        EnergyLabel::Mp => "#2196f3",
        EnergyLabel::En => "#00e5ff",
    };
    EntityView {
        name: vitals.name.clone(),
        hp: bar("HP", &vitals.hp_curr, &vitals.hp_max, "#e53935"),
        energy: bar(energy.label.as_str(), &energy.curr, &energy.max, energy_color),
        meters: visible_meters(&vitals.meters, opts),
        in_vehicle: entity.active_vehicle().is_some(),
    }
}

/// One line of the character picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub index: usize,
    pub kind: EntityKind,
    pub label: String,
    /// Set when the unit is shown as its active vehicle.
    pub vehicle: Option<VehicleKind>,
}

/// Picker labels in selection order. Units driving a vehicle show the
/// vehicle's name; a placeholder player name shows `viewer` instead.
pub fn roster(state: &RpgState, viewer: Option<&str>) -> Vec<RosterEntry> {
    let mut out = Vec::with_capacity(state.entity_count());
    let player_name = match state.player.name() {
        "{{user}}" | "Player" => viewer.unwrap_or("Player"),
        name => name,
    };
    out.push(entry(0, &state.player, player_name));
    for kind in [EntityKind::Party, EntityKind::Enemy, EntityKind::Npc] {
        for (i, e) in state.group(kind).iter().enumerate() {
            let name = if e.name().is_empty() { "Unit" } else { e.name() };
            out.push(entry(state.index_of(kind, i), e, name));
        }
    }
    out
}

fn entry(index: usize, e: &Entity, name: &str) -> RosterEntry {
    match e.active_vehicle() {
        Some(v) => RosterEntry {
            index,
            kind: e.kind,
            label: if v.vitals.name.is_empty() {
                "Vehicle".to_string()
            } else {
                v.vitals.name.clone()
            },
            vehicle: Some(v.kind),
        },
        None => RosterEntry {
            index,
            kind: e.kind,
            label: name.to_string(),
            vehicle: None,
        },
    }
}
