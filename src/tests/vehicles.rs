use super::*;
use crate::model::{EnergyLabel, StatValue};

fn vehicle_of(v: Value) -> Vehicle {
    normalize(json!({ "vehicle": v })).player.vehicle.unwrap()
}

#[test]
fn ship_energy_reads_as_en() {
    let v = vehicle_of(json!({"type": "ship", "en_curr": 40, "en_max": 100}));
    let r = v.energy();
    assert_eq!(r.curr, StatValue::from(40));
    assert_eq!(r.max, StatValue::from(100));
    assert_eq!(r.label, EnergyLabel::En);
    assert!(v.vitals.energy.mp_curr.is_none() && v.vitals.energy.mp_max.is_none());
}

#[test]
fn ship_aliases_all_feed_the_reading() {
    let v = vehicle_of(json!({"type": "ship", "en": 12, "enMax": 30}));
    assert_eq!(v.vitals.energy.en_curr, Some(StatValue::from(12)));
    assert_eq!(v.vitals.energy.en_max, Some(StatValue::from(30)));

    let v = vehicle_of(json!({"type": "ship", "en_current": 5, "en_capacity": 9}));
    let r = v.energy();
    assert_eq!((r.curr, r.max), (StatValue::from(5), StatValue::from(9)));
    assert!(v.extra.is_empty());
}

#[test]
fn ship_takes_mp_when_it_has_no_en() {
    let v = vehicle_of(json!({"type": "ship", "mp_curr": 20, "mp_max": 50}));
    assert_eq!(v.vitals.energy.en_curr, Some(StatValue::from(20)));
    assert_eq!(v.vitals.energy.en_max, Some(StatValue::from(50)));
    assert!(v.vitals.energy.mp_curr.is_none());
}

#[test]
fn non_ship_vehicle_stores_mp_and_reads_mp() {
    let v = vehicle_of(json!({"type": "car", "en": 8, "en_max": 10}));
    assert_eq!(v.kind, VehicleKind::Car);
    assert_eq!(v.vitals.energy.mp_curr, Some(StatValue::from(8)));
    assert!(v.vitals.energy.en_curr.is_none());
    assert_eq!(v.energy().label, EnergyLabel::Mp);
}

#[test]
fn vehicle_defaults() {
    let v = vehicle_of(json!({}));
    assert!(!v.active);
    assert_eq!(v.kind, VehicleKind::Mecha);
    assert_eq!(v.vitals.name, "Vehicle");
    let r = v.energy();
    assert_eq!(r.curr, StatValue::from(0));
}

#[test]
fn unknown_type_falls_back_to_mecha() {
    assert_eq!(vehicle_of(json!({"type": "zeppelin"})).kind, VehicleKind::Mecha);
    assert_eq!(vehicle_of(json!({"type": " Ship "})).kind, VehicleKind::Ship);
    assert_eq!(vehicle_of(json!({"type": "transport"})).kind, VehicleKind::Transport);
}

#[test]
fn core_fields_nested_in_stats_are_hoisted() {
    let v = vehicle_of(json!({
        "hp_max": 900,
        "stats": {"hp_curr": 500, "hp_max": 800, "mp_curr": 7, "atk": 10}
    }));
    assert_eq!(v.vitals.hp_curr, StatValue::from(500));
    assert_eq!(v.vitals.hp_max, StatValue::from(900));
    assert_eq!(v.vitals.energy.mp_curr, Some(StatValue::from(7)));
    assert_eq!(v.vitals.stats.atk, StatValue::from(10));
    assert!(!v.vitals.stats.extra.contains_key("hp_curr"));
}

#[test]
fn vehicle_gets_the_shared_migrations() {
    let v = vehicle_of(json!({
        "status": ["Overheating"],
        "survival": {"Fuel": 30},
        "stats": {"extra_1": 4}
    }));
    assert_eq!(v.vitals.status_effects.len(), 1);
    assert_eq!(v.vitals.meters[0].name, "Fuel");
    assert_eq!(v.vitals.stats.satk, StatValue::from(4));
    assert!(v.extra.is_empty());
}

#[test]
fn active_vehicle_drives_the_display() {
    let s = normalize(json!({
        "party": [{
            "name": "Kita",
            "hp_curr": 10,
            "vehicle": {"active": true, "type": "ship", "name": "Dawn", "hp_curr": 300, "en_curr": 40, "en_max": 100}
        }]
    }));
    let e = &s.party[0];
    assert_eq!(e.display_vitals().name, "Dawn");
    assert_eq!(e.display_vitals().hp_curr, StatValue::from(300));
    assert_eq!(e.display_energy().label, EnergyLabel::En);
    assert_eq!(e.energy().label, EnergyLabel::Mp);
}

#[test]
fn inactive_vehicle_does_not_drive_the_display() {
    let s = normalize(json!({"name": "Rin", "vehicle": {"active": false, "name": "Mk2"}}));
    assert_eq!(s.player.display_vitals().name, "Rin");
    assert!(s.player.active_vehicle().is_none());
}

#[test]
fn legacy_bond_keys_on_vehicle_are_dropped() {
    let v = vehicle_of(json!({"name": "Dawn", "Dawn Bond": "40/100", "Bond": 12, "callsign": "D1"}));
    assert!(!v.extra.contains_key("Dawn Bond"));
    assert!(!v.extra.contains_key("Bond"));
    assert_eq!(v.extra.get("callsign"), Some(&json!("D1")));

    let s = normalize(json!({"vehicle": {"Mech Bond": 5}}));
    let exported = export_value(&s).unwrap();
    assert!(exported["vehicle"].get("Mech Bond").is_none());
}
