use super::value::{ListEntry, Meter, StatValue};
use crate::number::serialize_number;
use serde::Serialize;
use serde_json::{Map, Value};

/// Which roster an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum EntityKind {
    #[default]
    Player,
    Party,
    Enemy,
    Npc,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Party => "party",
            EntityKind::Enemy => "enemy",
            EntityKind::Npc => "npc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    #[default]
    Mecha,
    Ship,
    Car,
    Transport,
}

impl VehicleKind {
    /// Unknown or empty names fall back to `Mecha`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "ship" => VehicleKind::Ship,
            "car" => VehicleKind::Car,
            "transport" => VehicleKind::Transport,
            _ => VehicleKind::Mecha,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleKind::Mecha => "mecha",
            VehicleKind::Ship => "ship",
            VehicleKind::Car => "car",
            VehicleKind::Transport => "transport",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stats {
    pub atk: StatValue,
    pub matk: StatValue,
    pub def: StatValue,
    pub satk: StatValue,
    pub sdef: StatValue,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Energy pool. Ships keep it under `en_*`, everything else under `mp_*`;
/// after normalization at most one of the two schemes is populated.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Energy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp_curr: Option<StatValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mp_max: Option<StatValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_curr: Option<StatValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_max: Option<StatValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyLabel {
    Mp,
    En,
}

impl EnergyLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLabel::Mp => "MP",
            EnergyLabel::En => "EN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReading {
    pub curr: StatValue,
    pub max: StatValue,
    pub label: EnergyLabel,
}

impl Energy {
    /// Unified reading: `mp_*` wins when present, `en_*` otherwise. The label
    /// is `EN` only for ship-typed vehicles.
    pub fn read(&self, ship: bool) -> EnergyReading {
        let has_mp = self.mp_curr.is_some() || self.mp_max.is_some();
        let (curr, max) = if has_mp {
            (&self.mp_curr, &self.mp_max)
        } else {
            (&self.en_curr, &self.en_max)
        };
        EnergyReading {
            curr: curr.clone().unwrap_or_default(),
            max: max.clone().unwrap_or_default(),
            label: if ship { EnergyLabel::En } else { EnergyLabel::Mp },
        }
    }

    /// Stores an edited reading under the scheme that fits the owner.
    pub fn set(&mut self, curr: StatValue, max: StatValue, ship: bool) {
        if ship {
            *self = Energy {
                en_curr: Some(curr),
                en_max: Some(max),
                ..Energy::default()
            };
        } else {
            *self = Energy {
                mp_curr: Some(curr),
                mp_max: Some(max),
                ..Energy::default()
            };
        }
    }
}

/// Fields shared by every stat-bearing record, vehicles included.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Vitals {
    pub name: String,
    pub hp_curr: StatValue,
    pub hp_max: StatValue,
    #[serde(flatten)]
    pub energy: Energy,
    pub meters: Vec<Meter>,
    pub stats: Stats,
    pub inventory: Vec<ListEntry>,
    pub skills: Vec<ListEntry>,
    pub passives: Vec<ListEntry>,
    pub masteries: Vec<ListEntry>,
    pub status_effects: Vec<ListEntry>,
    #[serde(rename = "dankcoin", serialize_with = "serialize_number")]
    pub currency: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Vehicle {
    pub active: bool,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    #[serde(flatten)]
    pub vitals: Vitals,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    pub fn is_ship(&self) -> bool {
        self.kind == VehicleKind::Ship
    }

    pub fn energy(&self) -> EnergyReading {
        self.vitals.energy.read(self.is_ship())
    }
}

/// The player, a party member, an enemy or an NPC.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Entity {
    #[serde(skip)]
    pub kind: EntityKind,
    #[serde(flatten)]
    pub vitals: Vitals,
    /// Affinity, normally 0 to 100; [`crate::number::BOND_SENTINEL`] means unbounded.
    #[serde(serialize_with = "serialize_number")]
    pub bond: f64,
    pub vehicle: Option<Vehicle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    pub fn name(&self) -> &str {
        &self.vitals.name
    }

    pub fn energy(&self) -> EnergyReading {
        self.vitals.energy.read(false)
    }

    /// The active vehicle, if this entity is currently driving one.
    pub fn active_vehicle(&self) -> Option<&Vehicle> {
        self.vehicle.as_ref().filter(|v| v.active)
    }

    /// The record whose vitals are shown: the active vehicle, else the entity.
    pub fn display_vitals(&self) -> &Vitals {
        match self.active_vehicle() {
            Some(v) => &v.vitals,
            None => &self.vitals,
        }
    }

    /// Energy of whatever is displayed for this entity.
    pub fn display_energy(&self) -> EnergyReading {
        match self.active_vehicle() {
            Some(v) => v.energy(),
            None => self.energy(),
        }
    }
}
