use super::*;
use serde_json::{Value, json};

// Shared test helpers
fn normalize(v: Value) -> RpgState {
    normalize_state(&v, &Options::default())
}

fn tagged(json: &str) -> String {
    format!("<rpg_state>{}</rpg_state>", json)
}

fn host_with(messages: Vec<Message>) -> MemoryHost {
    MemoryHost::new(messages)
}

fn parses(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("not JSON ({e}): {text}"))
}

// Submodules (topic-based)
mod bond_migration;
mod hud_view;
mod locator;
mod normalizer;
mod roundtrip;
mod vehicles;
