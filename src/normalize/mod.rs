//! Turns any parsed JSON value into a fully shaped [`RpgState`].
//!
//! The input is merged over the default template (input keys win), then every
//! entity is normalized: missing lists become empty, legacy aliases
//! (`status`, `survival`, `extra_1`/`extra_2`, `"<Name> Bond"`, vehicle `en`
//! variants) are migrated and removed. There is no failure path.

mod bond;
mod entity;
mod template;
mod vehicle;

pub use bond::{is_legacy_bond_key, scrub_bond_keys};

use crate::model::{Combat, Entity, EntityKind, ListEntry, RpgState, WorldTime};
use crate::number::{number_or, value_text};
use crate::options::Options;
use entity::{normalize_entity, truthy};
use serde_json::{Map, Value};

/// Keys that live on the world record rather than on the player entity.
const ROOT_ONLY: &[&str] = &[
    "location",
    "world_time",
    "quests",
    "env_effects",
    "combat",
    "party",
    "enemies",
    "npcs",
];

pub fn normalize_state(parsed: &Value, opts: &Options) -> RpgState {
    let mut template = template::root();
    let mut incoming = match parsed {
        Value::Object(m) => m.clone(),
        _ => Map::new(),
    };

    let mut world = Map::new();
    for key in ROOT_ONLY {
        let base = template.remove(*key);
        if let Some(v) = incoming.remove(*key).or(base) {
            world.insert(key.to_string(), v);
        }
    }

    let player = normalize_entity(&incoming, &template, EntityKind::Player, opts);

    let location = match world.remove("location") {
        None | Some(Value::Null) => "Unknown".to_string(),
        Some(v) => value_text(&v).into_owned(),
    };
    let world_time = world_time(world.remove("world_time"));
    let quests = ListEntry::list_from(world.remove("quests"));
    let env_effects = ListEntry::list_from(world.remove("env_effects"));
    let combat = match world.remove("combat") {
        Some(Value::Object(c)) => Combat {
            active: truthy(c.get("active")),
            round: number_or(c.get("round").filter(|v| !v.is_null()), 1.0),
        },
        _ => Combat::default(),
    };

    let unit = template::unit();
    let mut roster = |key: &str, kind: EntityKind| -> Vec<Entity> {
        let Some(Value::Array(items)) = world.remove(key) else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| match item {
                Value::Object(m) => normalize_entity(m, &unit, kind, opts),
                _ => normalize_entity(&Map::new(), &unit, kind, opts),
            })
            .collect()
    };
    let party = roster("party", EntityKind::Party);
    let enemies = roster("enemies", EntityKind::Enemy);
    let npcs = roster("npcs", EntityKind::Npc);

    RpgState {
        player,
        location,
        world_time,
        quests,
        env_effects,
        combat,
        party,
        enemies,
        npcs,
    }
}

fn world_time(v: Option<Value>) -> WorldTime {
    let defaults = WorldTime::default();
    let Some(Value::Object(wt)) = v else {
        return defaults;
    };
    let text = |key: &str, fallback: String| match wt.get(key) {
        None | Some(Value::Null) => fallback,
        Some(v) => strip_wrapping_quotes(&value_text(v)).to_string(),
    };
    WorldTime {
        month: text("month", defaults.month),
        day: number_or(wt.get("day").filter(|v| !v.is_null()), 1.0),
        clock: text("clock", defaults.clock),
    }
}

fn strip_wrapping_quotes(s: &str) -> &str {
    s.trim_matches('"')
}
