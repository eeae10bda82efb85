// src/plugin/components.rs

use crate::effector::{BodyId, BoxChain, EffectorConfig, EffectorResult, ForceEvaluator};
use bevy::prelude::*;
use std::time::Duration;

/// Ein Flächeneffektor in der Welt. Die Knoten der Kette liegen in
/// Weltkoordinaten.
#[derive(Component, Debug)]
pub struct PolygonAreaEffector {
    pub chain: BoxChain,
    pub config: EffectorConfig,
    pub(crate) evaluator: ForceEvaluator,
    /// Beim ersten Tick erfasste Körper, falls `config.bake_bodies`.
    pub(crate) baked_bodies: Option<Vec<Entity>>,
    pub(crate) initialized: bool,
    /// `Time<Virtual>::elapsed` bei der letzten Auswertung
    pub(crate) last_elapsed: Option<Duration>,
}

impl PolygonAreaEffector {
    pub fn new(chain: BoxChain, config: EffectorConfig) -> EffectorResult<Self> {
        config.validate()?;
        Ok(Self {
            chain,
            config,
            evaluator: ForceEvaluator::new(),
            baked_bodies: None,
            initialized: false,
            last_elapsed: None,
        })
    }

    pub fn evaluator(&self) -> &ForceEvaluator {
        &self.evaluator
    }

    pub fn touching(&self, body: Entity) -> bool {
        self.evaluator.touching(body_id(body))
    }

    pub fn time_inside(&self, body: Entity) -> f32 {
        self.evaluator.time_inside(body_id(body))
    }
}

/// Ein Körper, auf den Effektoren wirken.
///
/// Der Effektor schreibt nur in `impulse`; die eigentliche Physik liest den
/// Wert jeden Tick über `take_impulse` aus.
#[derive(Component, Debug, Default, Clone)]
pub struct FlowBody {
    /// Layer für die Maske des Effektors (0..32)
    pub layer: u8,
    pub impulse: Vec2,
}

impl FlowBody {
    pub fn new(layer: u8) -> Self {
        Self {
            layer,
            impulse: Vec2::ZERO,
        }
    }

    pub fn take_impulse(&mut self) -> Vec2 {
        std::mem::take(&mut self.impulse)
    }
}

pub(crate) fn body_id(entity: Entity) -> BodyId {
    BodyId(entity.to_bits())
}
