// src/plugin/events.rs

use crate::effector::TriggerEvent;
use bevy::prelude::*;

/// Enter/Stay/Exit eines Körpers an einem Effektor.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectorTriggerEvent {
    pub effector: Entity,
    pub body: Entity,
    pub kind: TriggerEvent,
}
