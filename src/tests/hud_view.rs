use super::*;
use crate::hud::{entity_view, inline_value, meter_color, roster, visible_meters};
use crate::model::{Meter, StatValue};

#[test]
fn bars_hide_empty_maximum() {
    let meters = vec![
        Meter::new("Stamina", 40, 80),
        Meter::new("Broken", 5, 0),
        Meter::new("Gone", 5, "-3"),
        Meter::new("Odd", 5, "lots"),
    ];
    let bars = visible_meters(&meters, &Options::default());
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].label, "Stamina");
    assert_eq!(bars[0].percent, 50.0);
    assert_eq!(bars[0].color, "#ffd54f");
}

#[test]
fn unbounded_meter_policy() {
    let meters = vec![Meter::new("Shield", "∞", "∞"), Meter::new("Mind", 3, "1e12")];
    let full = visible_meters(&meters, &Options::default());
    assert_eq!(full.len(), 2);
    assert!(full.iter().all(|b| b.percent == 100.0));

    let hidden = Options {
        unbounded_meter: UnboundedMeter::Hidden,
        ..Default::default()
    };
    assert!(visible_meters(&meters, &hidden).is_empty());
}

#[test]
fn percent_is_clamped() {
    let bars = visible_meters(&[Meter::new("Heat", 150, 100), Meter::new("Food", -4, 10)], &Options::default());
    assert_eq!(bars[0].percent, 100.0);
    assert_eq!(bars[1].percent, 0.0);
}

#[test]
fn colours_by_name() {
    assert_eq!(meter_color("Energy Shield"), "#00bcd4");
    assert_eq!(meter_color("Temp HP"), "#ff9800");
    assert_eq!(meter_color("Body Temp"), "#ff7043");
    assert_eq!(meter_color("SANITY"), "#64b5f6");
    assert_eq!(meter_color("Thirst"), "#4dd0e1");
    assert_eq!(meter_color("Taint"), "#ba68c8");
    assert_eq!(meter_color("Radiation"), "#cddc39");
    assert_eq!(meter_color("Luck"), "#26a69a");
}

#[test]
fn inline_formula_split() {
    let v = StatValue::from("260 ((100+100)*1.3)");
    let shown = inline_value(&v);
    assert_eq!(shown.shown, "260");
    assert_eq!(shown.formula, Some("(100+100)*1.3"));

    let plain = StatValue::from(12);
    assert_eq!(inline_value(&plain).shown, "12");
    assert_eq!(inline_value(&plain).formula, None);

    let words = StatValue::from("(none)");
    assert_eq!(inline_value(&words).formula, None);
}

#[test]
fn entity_view_for_plain_unit() {
    let s = normalize(json!({"name": "Aki", "hp_curr": 25, "hp_max": 100, "mp_curr": 3, "mp_max": 12}));
    let view = entity_view(&s.player, &Options::default());
    assert_eq!(view.name, "Aki");
    assert_eq!(view.hp.label, "HP");
    assert_eq!(view.hp.percent, 25.0);
    assert_eq!(view.hp.color, "#e53935");
    assert_eq!(view.energy.label, "MP");
    assert_eq!(view.energy.percent, 25.0);
    assert_eq!(view.energy.color, "#2196f3");
    assert!(!view.in_vehicle);
}

#[test]
fn entity_view_for_ship_pilot() {
    let s = normalize(json!({
        "name": "Aki",
        "vehicle": {"active": true, "type": "ship", "name": "Dawn", "en_curr": 10, "en_max": 40,
                    "meters": [{"name": "Barrier", "curr": 1, "max": 2}]}
    }));
    let view = entity_view(&s.player, &Options::default());
    assert_eq!(view.name, "Dawn");
    assert!(view.in_vehicle);
    assert_eq!(view.energy.label, "EN");
    assert_eq!(view.energy.curr, "10");
    assert_eq!(view.energy.color, "#00e5ff");
    assert_eq!(view.meters.len(), 1);
}

#[test]
fn roster_labels() {
    let s = normalize(json!({
        "party": [{"name": "Kita"}, {"name": "", "vehicle": {"active": true, "name": "", "type": "car"}}],
        "enemies": [{"name": ""}],
        "npcs": [{"name": "Mayor", "vehicle": {"active": false, "name": "Cart"}}]
    }));
    let entries = roster(&s, Some("Sam"));
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["Sam", "Kita", "Vehicle", "Unit", "Mayor"]);
    let indexes: Vec<usize> = entries.iter().map(|e| e.index).collect();
    assert_eq!(indexes, [0, 1, 2, 3, 4]);
    assert_eq!(entries[2].vehicle, Some(VehicleKind::Car));
    assert_eq!(entries[3].kind, EntityKind::Enemy);
    assert_eq!(entries[4].vehicle, None);
}

#[test]
fn player_placeholder_without_viewer() {
    let s = RpgState::default();
    assert_eq!(roster(&s, None)[0].label, "Player");

    let s = normalize(json!({"name": "Aki"}));
    assert_eq!(roster(&s, Some("Sam"))[0].label, "Aki");
}
