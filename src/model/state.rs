use super::entity::{Entity, EntityKind};
use super::value::ListEntry;
use crate::number::serialize_number;
use crate::options::Options;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldTime {
    pub month: String,
    #[serde(serialize_with = "serialize_number")]
    pub day: f64,
    pub clock: String,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            month: "Jan".to_string(),
            day: 1.0,
            clock: "12:00".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combat {
    pub active: bool,
    #[serde(serialize_with = "serialize_number")]
    pub round: f64,
}

impl Default for Combat {
    fn default() -> Self {
        Combat {
            active: false,
            round: 1.0,
        }
    }
}

/// The whole tracked state: the player entity, world-level fields and the
/// three rosters. Serializes to the flat object carried in `<rpg_state>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpgState {
    #[serde(flatten)]
    pub player: Entity,
    pub location: String,
    pub world_time: WorldTime,
    pub quests: Vec<ListEntry>,
    pub env_effects: Vec<ListEntry>,
    pub combat: Combat,
    pub party: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub npcs: Vec<Entity>,
}

impl Default for RpgState {
    /// The session-start template.
    fn default() -> Self {
        crate::normalize::normalize_state(&Value::Null, &Options::default())
    }
}

impl RpgState {
    pub fn group(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Player => std::slice::from_ref(&self.player),
            EntityKind::Party => &self.party,
            EntityKind::Enemy => &self.enemies,
            EntityKind::Npc => &self.npcs,
        }
    }

    pub(crate) fn group_mut(&mut self, kind: EntityKind) -> Option<&mut Vec<Entity>> {
        match kind {
            EntityKind::Player => None,
            EntityKind::Party => Some(&mut self.party),
            EntityKind::Enemy => Some(&mut self.enemies),
            EntityKind::Npc => Some(&mut self.npcs),
        }
    }

    /// Number of selectable entities: the player plus every roster member.
    pub fn entity_count(&self) -> usize {
        1 + self.party.len() + self.enemies.len() + self.npcs.len()
    }

    /// Resolves a flat selection index (0 = player, then party, enemies,
    /// npcs) to a roster and the position inside it.
    pub fn locate(&self, index: usize) -> Option<(EntityKind, usize)> {
        if index == 0 {
            return Some((EntityKind::Player, 0));
        }
        let mut pointer = index - 1;
        for kind in [EntityKind::Party, EntityKind::Enemy, EntityKind::Npc] {
            let len = self.group(kind).len();
            if pointer < len {
                return Some((kind, pointer));
            }
            pointer -= len;
        }
        None
    }

    /// Flat selection index of `group[i]`.
    pub fn index_of(&self, kind: EntityKind, i: usize) -> usize {
        match kind {
            EntityKind::Player => 0,
            EntityKind::Party => 1 + i,
            EntityKind::Enemy => 1 + self.party.len() + i,
            EntityKind::Npc => 1 + self.party.len() + self.enemies.len() + i,
        }
    }

    pub fn entity(&self, index: usize) -> Option<&Entity> {
        let (kind, i) = self.locate(index)?;
        self.group(kind).get(i)
    }

    pub fn entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        match self.locate(index)? {
            (EntityKind::Player, _) => Some(&mut self.player),
            (kind, i) => self.group_mut(kind)?.get_mut(i),
        }
    }
}
