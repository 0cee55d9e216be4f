//! Typed state tree produced by the normalizer.
//!
//! Only `Serialize` is derived: the single way in is
//! [`crate::normalize::normalize_state`], which accepts any JSON value.

mod entity;
mod state;
mod value;

pub use entity::{
    Energy, EnergyLabel, EnergyReading, Entity, EntityKind, Stats, Vehicle, VehicleKind, Vitals,
};
pub use state::{Combat, RpgState, WorldTime};
pub use value::{Item, ListEntry, Meter, StatValue};
