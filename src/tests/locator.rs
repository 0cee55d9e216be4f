use super::*;
use crate::locate::{block_inner, block_span, find_latest_index, replace_block, wrap_block};

#[test]
fn newest_agent_block_wins_and_user_blocks_are_skipped() {
    let messages = vec![
        Message::agent("no tag here"),
        Message::user(&tagged("B")),
        Message::agent(&tagged("X")),
        Message::agent(&format!("story... {}", tagged("Y"))),
    ];
    let found = find_latest_block(&messages).unwrap();
    assert_eq!(found.inner, "Y");
    assert_eq!(found.index, 3);
}

#[test]
fn user_message_after_agent_block_is_ignored() {
    let messages = vec![Message::agent(&tagged("X")), Message::user(&tagged("B"))];
    let found = find_latest_block(&messages).unwrap();
    assert_eq!(found.inner, "X");
    assert_eq!(found.index, 0);
}

#[test]
fn scans_past_untagged_agent_messages() {
    let messages = vec![
        Message::agent(&tagged("old")),
        Message::agent("plain reply"),
        Message::user("hi"),
        Message::agent("another plain reply"),
    ];
    assert_eq!(find_latest_index(&messages), Some(0));
}

#[test]
fn nothing_found() {
    assert!(find_latest_block(&[]).is_none());
    let all_user = vec![Message::user(&tagged("{}")), Message::user("x")];
    assert!(find_latest_block(&all_user).is_none());
    let untagged = vec![Message::agent("<rpg_state>unterminated")];
    assert!(find_latest_block(&untagged).is_none());
}

#[test]
fn missing_author_flag_counts_as_agent() {
    let msg = Message {
        is_user: None,
        mes: Some(tagged("Z")),
        ..Message::default()
    };
    assert_eq!(find_latest_block(&[msg]).unwrap().inner, "Z");
}

#[test]
fn tag_match_ignores_case_and_attributes() {
    let text = "<RPG_STATE version=\"2\">{\"a\":1}</Rpg_State>";
    assert_eq!(block_inner(text), Some("{\"a\":1}"));
}

#[test]
fn block_spans_lines() {
    let text = "before\n<rpg_state>\n{\n  \"a\": 1\n}\n</rpg_state>\nafter";
    assert_eq!(block_inner(text), Some("\n{\n  \"a\": 1\n}\n"));
    let span = block_span(text).unwrap();
    assert_eq!(&text[..span.start], "before\n");
    assert_eq!(&text[span.end..], "\nafter");
}

#[test]
fn similar_tag_names_do_not_match() {
    assert_eq!(block_inner("<rpg_stateful>{}</rpg_state>"), None);
}

#[test]
fn replace_keeps_surrounding_bytes() {
    let text = "pre <rpg_state>{a:1}</rpg_state> post";
    let out = replace_block(text, &wrap_block("{\"a\":2}")).unwrap();
    assert_eq!(out, "pre <rpg_state>{\"a\":2}</rpg_state> post");
}

#[test]
fn replace_only_touches_the_first_block() {
    let text = "<rpg_state>1</rpg_state> mid <rpg_state>2</rpg_state>";
    let out = replace_block(text, &wrap_block("9")).unwrap();
    assert_eq!(out, "<rpg_state>9</rpg_state> mid <rpg_state>2</rpg_state>");
}

#[test]
fn replacement_text_is_literal() {
    let text = "x <rpg_state>{}</rpg_state> y";
    let block = wrap_block("{\"note\":\"costs $1 or ${2}\"}");
    let out = replace_block(text, &block).unwrap();
    assert_eq!(out, format!("x {} y", block));
}

#[test]
fn replace_without_block_is_none() {
    assert_eq!(replace_block("no tag", "<rpg_state>{}</rpg_state>"), None);
}
