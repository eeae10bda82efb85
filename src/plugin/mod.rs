// src/plugin/mod.rs

//! Anbindung an Bevy: Komponenten, Events und das System im `FixedUpdate`.

pub mod components;
pub mod events;
pub mod systems;

pub use self::components::{FlowBody, PolygonAreaEffector};
pub use self::events::EffectorTriggerEvent;
pub use self::systems::apply_area_effectors_system;

use bevy::prelude::*;

pub struct PolygonAreaEffectorPlugin;

impl Plugin for PolygonAreaEffectorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EffectorTriggerEvent>()
            .add_systems(FixedUpdate, apply_area_effectors_system);
    }
}
