//! Field editing for the selected entity.
//!
//! An [`Edit`] carries the editor's raw text inputs; `None` leaves a field
//! alone. Values are parsed the way the form fields are: numeric-looking
//! stats become numbers, anything else is kept verbatim.

use crate::error::SessionError;
use crate::model::{
    Entity, ListEntry, Meter, RpgState, StatValue, Vehicle, VehicleKind, Vitals,
};
use crate::normalize::scrub_bond_keys;
use crate::number::{BOND_SENTINEL, clamp, parse_bond_text, parse_number};
use crate::options::Options;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edit {
    pub name: Option<String>,
    pub hp_curr: Option<String>,
    pub hp_max: Option<String>,
    pub energy_curr: Option<String>,
    pub energy_max: Option<String>,
    pub currency: Option<String>,
    /// `Name | curr | max` lines.
    pub meters: Option<String>,
    pub stats: Option<StatsEdit>,
    /// Comma separated.
    pub status_effects: Option<String>,
    /// One entry per line.
    pub inventory: Option<String>,
    pub skills: Option<String>,
    pub passives: Option<String>,
    pub masteries: Option<String>,
    /// Applied to the entity itself, never to its vehicle.
    pub bond: Option<String>,
    pub vehicle: Option<VehicleEdit>,
    /// Only honoured when the player is selected.
    pub world: Option<WorldEdit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsEdit {
    pub atk: String,
    pub matk: String,
    pub def: String,
    pub satk: String,
    pub sdef: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleEdit {
    pub active: bool,
    pub kind: VehicleKind,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldEdit {
    pub location: String,
    pub month: String,
    pub day: String,
    pub clock: String,
    pub quests: String,
    pub env_effects: String,
}

/// Parses meter lines. `|` separates fields, `,` is accepted when a line has
/// fewer than three `|` fields; blank lines and `#`/`//` comments are skipped.
pub fn parse_meters_text(text: &str) -> Vec<Meter> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("//"))
        .filter_map(|line| {
            let mut parts: Vec<&str> = line.split('|').map(str::trim).collect();
            if parts.len() < 3 {
                parts = line.split(',').map(str::trim).collect();
            }
            if parts.len() < 3 || parts[0].is_empty() {
                return None;
            }
            Some(Meter {
                name: parts[0].to_string(),
                curr: StatValue::parse(parts[1]),
                max: StatValue::parse(parts[2]),
            })
        })
        .collect()
}

pub fn meters_to_text(meters: &[Meter]) -> String {
    meters
        .iter()
        .map(|m| format!("{} | {} | {}", m.name, m.curr.text(), m.max.text()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Non-empty trimmed lines.
pub fn parse_lines(text: &str) -> Vec<ListEntry> {
    text.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ListEntry::from)
        .collect()
}

/// Non-empty trimmed comma-separated items.
pub fn parse_comma_list(text: &str) -> Vec<ListEntry> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ListEntry::from)
        .collect()
}

fn whole_number(s: &str) -> f64 {
    parse_number(s).unwrap_or(0.0)
}

/// Applies `edit` to the entity at flat selection `index`.
pub fn apply_edit(
    state: &mut RpgState,
    index: usize,
    edit: &Edit,
    opts: &Options,
) -> Result<(), SessionError> {
    let root = state
        .entity_mut(index)
        .ok_or(SessionError::InvalidSelection(index))?;
    apply_to_entity(root, edit, opts);

    if index == 0 {
        if let Some(w) = &edit.world {
            state.location = w.location.clone();
            state.world_time.month = w.month.clone();
            state.world_time.day = whole_number(&w.day);
            state.world_time.clock = w.clock.clone();
            state.quests = parse_lines(&w.quests);
            state.env_effects = parse_lines(&w.env_effects);
        }
    }
    Ok(())
}

fn apply_to_entity(root: &mut Entity, edit: &Edit, opts: &Options) {
    // Vitals edits go to whatever is on screen: the active vehicle, if any.
    match root.vehicle.as_mut().filter(|v| v.active) {
        Some(v) => {
            let ship = v.is_ship();
            apply_to_vitals(&mut v.vitals, edit, ship);
        }
        None => apply_to_vitals(&mut root.vitals, edit, false),
    }

    if let Some(b) = &edit.bond {
        root.bond = clamp(parse_bond_text(b), opts.bond_min(), BOND_SENTINEL);
        scrub_bond_keys(&mut root.extra);
    }

    if let Some(ve) = edit.vehicle {
        let v = root.vehicle.get_or_insert_with(|| Vehicle {
            vitals: Vitals {
                name: "Vehicle".to_string(),
                ..Vitals::default()
            },
            ..Vehicle::default()
        });
        v.active = ve.active;
        if v.kind != ve.kind {
            let reading = v.energy();
            v.kind = ve.kind;
            let ship = v.is_ship();
            v.vitals.energy.set(reading.curr, reading.max, ship);
        }
    }
}

fn apply_to_vitals(v: &mut Vitals, edit: &Edit, ship: bool) {
    if let Some(name) = &edit.name {
        v.name = name.clone();
    }
    if let Some(s) = &edit.hp_curr {
        v.hp_curr = StatValue::parse(s);
    }
    if let Some(s) = &edit.hp_max {
        v.hp_max = StatValue::parse(s);
    }
    if edit.energy_curr.is_some() || edit.energy_max.is_some() {
        let current = v.energy.read(ship);
        let curr = edit
            .energy_curr
            .as_deref()
            .map(StatValue::parse)
            .unwrap_or(current.curr);
        let max = edit
            .energy_max
            .as_deref()
            .map(StatValue::parse)
            .unwrap_or(current.max);
        v.energy.set(curr, max, ship);
    }
    if let Some(s) = &edit.currency {
        v.currency = whole_number(s);
    }
    if let Some(text) = &edit.meters {
        v.meters = parse_meters_text(text);
    }
    if let Some(s) = &edit.stats {
        v.stats.atk = StatValue::parse(&s.atk);
        v.stats.matk = StatValue::parse(&s.matk);
        v.stats.def = StatValue::parse(&s.def);
        v.stats.satk = StatValue::parse(&s.satk);
        v.stats.sdef = StatValue::parse(&s.sdef);
    }
    if let Some(s) = &edit.status_effects {
        v.status_effects = parse_comma_list(s);
    }
    let lists = [
        (&edit.inventory, &mut v.inventory),
        (&edit.skills, &mut v.skills),
        (&edit.passives, &mut v.passives),
        (&edit.masteries, &mut v.masteries),
    ];
    for (text, list) in lists {
        if let Some(text) = text {
            *list = parse_lines(text);
        }
    }
}
