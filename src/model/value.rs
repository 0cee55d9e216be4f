use crate::number::{is_infinity_token, parse_float_prefix, value_text};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::borrow::Cow;

/// A gauge or stat reading. Models write plain numbers, but also strings that
/// carry the working (`"260 ((100+100)*1.3)"`) or an infinity token; the text
/// form is kept verbatim so it survives a write-back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(Number),
    Text(String),
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue::Number(Number::from(0))
    }
}

impl From<i64> for StatValue {
    fn from(n: i64) -> Self {
        StatValue::Number(Number::from(n))
    }
}

impl From<i32> for StatValue {
    fn from(n: i32) -> Self {
        StatValue::Number(Number::from(n))
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Text(s.to_string())
    }
}

impl StatValue {
    /// Coerces any JSON value; `null` yields `None` so callers can fall back.
    pub fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Null => None,
            Value::Number(n) => Some(StatValue::Number(n.clone())),
            Value::String(s) => Some(StatValue::Text(s.clone())),
            other => Some(StatValue::Text(value_text(other).into_owned())),
        }
    }

    pub(crate) fn from_opt(v: Option<Value>) -> Self {
        v.as_ref().and_then(Self::from_value).unwrap_or_default()
    }

    /// Editor input: numeric text becomes a number, anything else stays text.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        match serde_json::from_str::<Number>(t) {
            Ok(n) => StatValue::Number(n),
            Err(_) => StatValue::Text(t.to_string()),
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            StatValue::Number(n) => Cow::Owned(n.to_string()),
            StatValue::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Leading number of the reading, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Number(n) => n.as_f64(),
            StatValue::Text(s) => parse_float_prefix(s),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        is_infinity_token(&self.text())
    }

    /// Splits `"260 ((100+100)*1.3)"` into the shown value and its formula.
    pub fn split_formula(&self) -> (Cow<'_, str>, Option<&str>) {
        let StatValue::Text(s) = self else {
            return (self.text(), None);
        };
        let Some(open) = s.find('(') else {
            return (Cow::Borrowed(s.as_str()), None);
        };
        let head = s[..open].trim_end();
        if head.is_empty() || !s.ends_with(')') {
            return (Cow::Borrowed(s.as_str()), None);
        }
        (Cow::Borrowed(head), Some(&s[open + 1..s.len() - 1]))
    }
}

/// Structured list entry (`{"name": "Potion", "cost": 5, "equipped": true}`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Item {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipped: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub(crate) fn from_map(mut m: Map<String, Value>) -> Self {
        let name = m
            .remove("name")
            .filter(|v| !v.is_null())
            .map(|v| value_text(&v).into_owned());
        let cost = m.remove("cost").filter(|v| !v.is_null());
        let kind = take_string(&mut m, "type");
        let effect = take_string(&mut m, "effect");
        let equipped = match m.get("equipped") {
            Some(Value::Bool(b)) => {
                let b = *b;
                m.remove("equipped");
                Some(b)
            }
            _ => None,
        };
        Item {
            name,
            cost,
            kind,
            effect,
            equipped,
            extra: m,
        }
    }
}

fn take_string(m: &mut Map<String, Value>, key: &str) -> Option<String> {
    match m.get(key) {
        Some(Value::String(_)) => match m.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Inventory, skill, quest or effect entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ListEntry {
    Text(String),
    Item(Item),
}

impl ListEntry {
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            ListEntry::Text(s) => Cow::Borrowed(s.as_str()),
            ListEntry::Item(item) => match &item.name {
                Some(n) => Cow::Borrowed(n.as_str()),
                None => Cow::Borrowed(""),
            },
        }
    }

    pub(crate) fn list_from(v: Option<Value>) -> Vec<ListEntry> {
        let Some(Value::Array(items)) = v else {
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(ListEntry::Text(s)),
                Value::Object(m) => Some(ListEntry::Item(Item::from_map(m))),
                other => Some(ListEntry::Text(value_text(&other).into_owned())),
            })
            .collect()
    }
}

impl From<&str> for ListEntry {
    fn from(s: &str) -> Self {
        ListEntry::Text(s.to_string())
    }
}

/// A named gauge beyond HP and energy (stamina, sanity, shields, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meter {
    pub name: String,
    pub curr: StatValue,
    pub max: StatValue,
}

impl Meter {
    pub fn new(name: &str, curr: impl Into<StatValue>, max: impl Into<StatValue>) -> Self {
        Meter {
            name: name.to_string(),
            curr: curr.into(),
            max: max.into(),
        }
    }
}
