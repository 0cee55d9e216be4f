use super::*;

fn renormalize(s: &RpgState) -> RpgState {
    normalize(export_value(s).unwrap())
}

#[test]
fn normalizing_exported_state_is_stable() {
    let inputs = [
        json!(null),
        json!({"name": "Aki", "Kita Bond": "15/100", "status": ["Old"], "survival": {"Hunger": 3}}),
        json!({
            "party": [{"name": "Kita", "bond": "∞", "vehicle": {"active": true, "type": "ship", "en": 4}}],
            "enemies": [{"name": "Slime", "hp_curr": "12 (3*4)"}],
            "combat": {"active": true, "round": 4},
            "world_time": {"month": "Feb", "day": 9, "clock": "7:15"}
        }),
        json!({"inventory": [{"name": "Potion", "cost": 5, "rarity": "rare"}], "dankcoin": "33"}),
    ];
    for input in inputs {
        let once = normalize(input.clone());
        assert_eq!(renormalize(&once), once, "unstable for {input}");
    }
}

#[test]
fn parse_block_plain_and_repaired() {
    let opts = Options::default();
    let plain = parse_block(r#"{"name":"Aki"}"#, &opts).unwrap();
    assert!(!plain.repaired);
    assert_eq!(plain.state.player.name(), "Aki");

    let fixed = parse_block(r#"{"name":"Aki","bond":"15/100","hp_curr":40"}"#, &opts).unwrap();
    assert!(fixed.repaired);
    assert_eq!(fixed.state.player.bond, 15.0);
}

#[test]
fn parse_block_reports_diagnostic() {
    let d = parse_block("{\"name\" \"Aki\"", &Options::default()).unwrap_err();
    assert_eq!(d.stage, ParseStage::Repaired);
    assert!(d.offset.is_some());
    assert!(!d.caret.is_empty());
}

#[test]
fn parse_message_finds_the_block() {
    let text = format!("The fight ends.\n{}", tagged("```json\n{\"location\": \"Camp\",}\n```"));
    let parsed = parse_message(&text, &Options::default()).unwrap();
    assert_eq!(parsed.state.location, "Camp");
    assert!(!parsed.repaired);

    assert_eq!(
        parse_message("no block", &Options::default()),
        Err(ScanError::NoTag)
    );
}

#[test]
fn scan_then_write_back_is_idempotent() {
    let raw = r#"{"name":"Aki","party":[{"name":"Kita","Kita Bond":"20/100"}]}"#;
    let mut host = host_with(vec![Message::agent(&tagged(raw))]);
    let mut session = Session::default();
    session.scan(&mut host, Trigger::Manual).unwrap();
    let first = host.messages[0].text().unwrap().to_string();

    session.scan(&mut host, Trigger::Manual).unwrap();
    assert_eq!(host.messages[0].text(), Some(first.as_str()));
    assert!(!first.contains("Kita Bond"));
}
