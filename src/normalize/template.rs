use serde_json::{Map, Value, json};

/// Default state at session start and the base every scan merges over.
pub fn root() -> Map<String, Value> {
    let Value::Object(m) = json!({
        "name": "{{user}}",
        "hp_curr": 0,
        "hp_max": 100,
        "mp_curr": 0,
        "mp_max": 100,
        "meters": [],
        "stats": { "atk": 0, "matk": 0, "def": 0, "satk": 0, "sdef": 0 },
        "inventory": ["(Reset)"],
        "skills": [],
        "passives": [],
        "masteries": [],
        "quests": [],
        "env_effects": [],
        "status_effects": [],
        "dankcoin": 0,
        "location": "Unknown",
        "world_time": { "month": "Jan", "day": 1, "clock": "12:00" },
        "combat": { "active": false, "round": 1 },
        "vehicle": {
            "active": false,
            "type": "mecha",
            "name": "Mech-01",
            "hp_curr": 1000,
            "hp_max": 1000,
            "mp_curr": 100,
            "mp_max": 100,
            "meters": [],
            "stats": { "atk": 0, "matk": 0, "def": 0, "satk": 0, "sdef": 0 },
            "inventory": ["Vulcan Cannon"],
            "skills": [],
            "passives": [],
            "status_effects": [],
            "dankcoin": 0
        },
        "party": [],
        "enemies": [],
        "npcs": []
    }) else {
        unreachable!("template literal is an object")
    };
    m
}

/// Base for party members, enemies and NPCs.
pub fn unit() -> Map<String, Value> {
    let Value::Object(m) = json!({
        "name": "Unit",
        "hp_curr": 0,
        "hp_max": 0,
        "mp_curr": 0,
        "mp_max": 0,
        "meters": [],
        "stats": { "atk": 0, "matk": 0, "def": 0, "satk": 0, "sdef": 0 },
        "inventory": [],
        "skills": [],
        "passives": [],
        "masteries": [],
        "status_effects": [],
        "vehicle": null,
        "bond": 0,
        "dankcoin": 0
    }) else {
        unreachable!("template literal is an object")
    };
    m
}
