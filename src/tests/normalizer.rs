use super::*;
use crate::model::{ListEntry, Meter, StatValue};

#[test]
fn null_input_yields_the_default_template() {
    let s = normalize(Value::Null);
    assert_eq!(s.player.name(), "{{user}}");
    assert_eq!(s.player.vitals.hp_max, StatValue::from(100));
    assert_eq!(s.player.vitals.inventory, vec![ListEntry::from("(Reset)")]);
    assert_eq!(s.location, "Unknown");
    assert_eq!(s.world_time.month, "Jan");
    assert_eq!(s.world_time.day, 1.0);
    assert_eq!(s.world_time.clock, "12:00");
    assert!(!s.combat.active);
    assert_eq!(s.combat.round, 1.0);
    assert!(s.party.is_empty() && s.enemies.is_empty() && s.npcs.is_empty());
    let v = s.player.vehicle.as_ref().unwrap();
    assert_eq!(v.vitals.name, "Mech-01");
    assert!(!v.active);
    assert_eq!(v.kind, VehicleKind::Mecha);
    assert_eq!(s, RpgState::default());
}

#[test]
fn any_json_value_is_accepted() {
    for v in [json!(42), json!("text"), json!([1, 2]), json!(true), json!({})] {
        let s = normalize(v);
        assert_eq!(s.player.name(), "{{user}}");
    }
}

#[test]
fn input_keys_win_over_template() {
    let s = normalize(json!({
        "name": "Aki",
        "hp_curr": 40,
        "inventory": ["Rope"],
        "location": "Harbor",
        "vehicle": null
    }));
    assert_eq!(s.player.name(), "Aki");
    assert_eq!(s.player.vitals.hp_curr, StatValue::from(40));
    assert_eq!(s.player.vitals.hp_max, StatValue::from(100));
    assert_eq!(s.player.vitals.inventory, vec![ListEntry::from("Rope")]);
    assert_eq!(s.location, "Harbor");
    assert!(s.player.vehicle.is_none());
}

#[test]
fn wrong_typed_lists_become_empty() {
    let s = normalize(json!({
        "skills": "Fireball",
        "quests": {"a": 1},
        "party": "nobody",
        "status_effects": null
    }));
    assert!(s.player.vitals.skills.is_empty());
    assert!(s.quests.is_empty());
    assert!(s.party.is_empty());
    assert!(s.player.vitals.status_effects.is_empty());
}

#[test]
fn roster_entries_of_any_shape_become_units() {
    let s = normalize(json!({"party": [1, null, {"name": null}, {"name": "Kita"}]}));
    let names: Vec<&str> = s.party.iter().map(|e| e.name()).collect();
    assert_eq!(names, ["Unit", "Unit", "Unit", "Kita"]);
    assert!(s.party.iter().all(|e| e.kind == EntityKind::Party));
    assert!(s.party[3].vehicle.is_none());
    assert_eq!(s.party[3].bond, 0.0);
}

#[test]
fn roster_kinds_follow_their_group() {
    let s = normalize(json!({"enemies": [{}], "npcs": [{}, {}]}));
    assert_eq!(s.enemies[0].kind, EntityKind::Enemy);
    assert_eq!(s.npcs[1].kind, EntityKind::Npc);
    assert_eq!(s.player.kind, EntityKind::Player);
}

#[test]
fn legacy_status_feeds_status_effects() {
    let s = normalize(json!({"party": [{"status": ["Poisoned"]}]}));
    let e = &s.party[0];
    assert_eq!(e.vitals.status_effects, vec![ListEntry::from("Poisoned")]);
    assert!(!e.extra.contains_key("status"));

    let s = normalize(json!({"party": [{"status": ["Old"], "status_effects": ["New"]}]}));
    assert_eq!(s.party[0].vitals.status_effects, vec![ListEntry::from("New")]);
    assert!(!s.party[0].extra.contains_key("status"));
}

#[test]
fn legacy_extra_stats_migrate_only_when_missing() {
    let s = normalize(json!({"stats": {"atk": 5, "extra_1": 3, "extra_2": "4"}}));
    let st = &s.player.vitals.stats;
    assert_eq!(st.atk, StatValue::from(5));
    assert_eq!(st.satk, StatValue::from(3));
    assert_eq!(st.sdef, StatValue::from("4"));
    assert_eq!(st.matk, StatValue::from(0));
    assert!(st.extra.is_empty());

    let s = normalize(json!({"stats": {"satk": 9, "extra_1": 3, "luck": 2}}));
    let st = &s.player.vitals.stats;
    assert_eq!(st.satk, StatValue::from(9));
    assert!(!st.extra.contains_key("extra_1"));
    assert_eq!(st.extra.get("luck"), Some(&json!(2)));
}

#[test]
fn currency_is_coerced() {
    let s = normalize(json!({"dankcoin": "250", "party": [{"dankcoin": "lots"}]}));
    assert_eq!(s.player.vitals.currency, 250.0);
    assert_eq!(s.party[0].vitals.currency, 0.0);
}

#[test]
fn meters_accept_aliases_and_drop_nameless() {
    let s = normalize(json!({"meters": [
        {"name": "Stamina", "curr": 40, "max": 80},
        {"label": "Sanity", "value": 7},
        {"curr": 3},
        {"name": "", "curr": 1},
        "junk"
    ]}));
    assert_eq!(
        s.player.vitals.meters,
        vec![Meter::new("Stamina", 40, 80), Meter::new("Sanity", 7, 100)]
    );
}

#[test]
fn survival_map_becomes_meters_when_none_exist() {
    let s = normalize(json!({"survival": {"Hunger": 40, "Thirst": "55"}}));
    assert_eq!(
        s.player.vitals.meters,
        vec![Meter::new("Hunger", 40, 100), Meter::new("Thirst", "55", 100)]
    );
    assert!(!s.player.extra.contains_key("survival"));

    let s = normalize(json!({
        "meters": [{"name": "Shield", "curr": 5, "max": 10}],
        "survival": {"Hunger": 40}
    }));
    assert_eq!(s.player.vitals.meters, vec![Meter::new("Shield", 5, 10)]);
    assert!(!s.player.extra.contains_key("survival"));
}

#[test]
fn world_time_fields_default_independently() {
    let s = normalize(json!({"world_time": {"month": "\"Feb\"", "day": "x"}}));
    assert_eq!(s.world_time.month, "Feb");
    assert_eq!(s.world_time.day, 1.0);
    assert_eq!(s.world_time.clock, "12:00");

    let s = normalize(json!({"world_time": "noon"}));
    assert_eq!(s.world_time, crate::model::WorldTime::default());
}

#[test]
fn combat_is_rebuilt() {
    let s = normalize(json!({"combat": {"active": "yes", "round": "3", "log": []}}));
    assert!(s.combat.active);
    assert_eq!(s.combat.round, 3.0);

    let s = normalize(json!({"combat": {"active": 0}}));
    assert!(!s.combat.active);
    assert_eq!(s.combat.round, 1.0);

    let s = normalize(json!({"combat": "over"}));
    assert!(!s.combat.active);
}

#[test]
fn structured_list_items_are_kept() {
    let s = normalize(json!({"inventory": [
        {"name": "Potion", "cost": 5, "type": "consumable", "equipped": false, "rarity": "common"},
        7
    ]}));
    let inv = &s.player.vitals.inventory;
    let ListEntry::Item(item) = &inv[0] else {
        panic!("expected item, got {:?}", inv[0]);
    };
    assert_eq!(item.name.as_deref(), Some("Potion"));
    assert_eq!(item.kind.as_deref(), Some("consumable"));
    assert_eq!(item.equipped, Some(false));
    assert_eq!(item.extra.get("rarity"), Some(&json!("common")));
    assert_eq!(inv[1], ListEntry::from("7"));
    assert_eq!(inv[0].label(), "Potion");
}

#[test]
fn unknown_keys_survive() {
    let s = normalize(json!({"title": "Knight", "party": [{"role": "healer"}]}));
    assert_eq!(s.player.extra.get("title"), Some(&json!("Knight")));
    assert_eq!(s.party[0].extra.get("role"), Some(&json!("healer")));
}

#[test]
fn entity_en_aliases_read_as_mp() {
    let s = normalize(json!({"party": [{"name": "Bot", "en": 30, "en_max": 60}]}));
    let e = &s.party[0];
    let reading = e.energy();
    assert_eq!(reading.curr, StatValue::from(30));
    assert_eq!(reading.max, StatValue::from(60));
    assert_eq!(reading.label.as_str(), "MP");
    assert!(e.vitals.energy.en_curr.is_none());
    assert!(!e.extra.contains_key("en"));
}

#[test]
fn entity_mp_wins_over_en() {
    let s = normalize(json!({"mp_curr": 5, "mp_max": 9, "en_curr": 70}));
    let reading = s.player.energy();
    assert_eq!(reading.curr, StatValue::from(5));
    assert_eq!(reading.max, StatValue::from(9));
    assert!(!s.player.extra.contains_key("en_curr"));
}

#[test]
fn doubled_quotes_on_world_time_are_stripped() {
    let s = normalize(json!({"world_time": {"month": "\"\"Jan\"\"", "clock": "\"9:00\""}}));
    assert_eq!(s.world_time.month, "Jan");
    assert_eq!(s.world_time.clock, "9:00");
    let again = normalize(export_value(&s).unwrap());
    assert_eq!(again.world_time, s.world_time);
}
