// src/effector/evaluator.rs

use super::{
    box_cell::{BoxId, FlowBox},
    callback::{BodyId, EffectedBody, EffectorCallback, TriggerInfo},
    chain::BoxChain,
    config::{EffectorConfig, ForceType},
};
use crate::math::types::{Bounds2D, Point2D};
use bevy::log::trace;
use std::collections::HashMap;

/// Die zwei Zeitschritte eines Ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickTiming {
    /// Fester Simulationsschritt, skaliert die Kraft.
    pub fixed_delta: f32,
    /// Tatsächlich vergangene Zeit, wird auf die Aufenthaltszeit addiert.
    pub frame_delta: f32,
}

impl TickTiming {
    pub fn new(fixed_delta: f32, frame_delta: f32) -> Self {
        Self {
            fixed_delta,
            frame_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    #[default]
    Outside,
    Inside,
}

/// Zustand eines Körpers relativ zum Feld.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyTrack {
    pub state: TrackState,
    /// Sekunden ununterbrochen im Feld, 0 außerhalb.
    pub time_inside: f32,
}

/// Wertet pro Tick alle Kandidaten gegen die Kette aus.
///
/// Einträge werden beim ersten Kandidatentest angelegt und nie entfernt.
/// Nicht threadsicher; bei Zugriff aus mehreren Threads muss der Host
/// synchronisieren.
#[derive(Debug, Clone, Default)]
pub struct ForceEvaluator {
    tracked: HashMap<BodyId, BodyTrack>,
}

impl ForceEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt Einträge mit Zeit 0 für alle Körper an, die beim Start bekannt sind.
    pub fn register_bodies<I>(&mut self, bodies: I)
    where
        I: IntoIterator<Item = BodyId>,
    {
        for id in bodies {
            self.tracked.entry(id).or_default();
        }
    }

    pub fn track(&self, body: BodyId) -> Option<BodyTrack> {
        self.tracked.get(&body).copied()
    }

    /// Aufenthaltszeit, 0 für unbekannte Körper.
    pub fn time_inside(&self, body: BodyId) -> f32 {
        self.tracked.get(&body).map_or(0.0, |t| t.time_inside)
    }

    pub fn touching(&self, body: BodyId) -> bool {
        self.time_inside(body) > 0.0
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Kraft einer Box auf einen Körper an `position`.
    pub fn compute_force(
        flow_box: &FlowBox,
        config: &EffectorConfig,
        position: Point2D,
        time_inside: f32,
        fixed_delta: f32,
    ) -> Point2D {
        let magnitude = config.force * 10.0 + time_inside * 3.0 * config.force_over_time * 10.0;
        let mut force = flow_box.relative_direction(position) * fixed_delta * magnitude;
        match config.force_type {
            ForceType::XY => {}
            ForceType::X => force.y = 0.0,
            ForceType::Y => force.x = 0.0,
        }
        force
    }

    /// Ein kompletter Tick. Die Kette muss vorher gebacken sein.
    pub fn process<'a, B, I, C>(
        &mut self,
        chain: &BoxChain,
        config: &EffectorConfig,
        timing: TickTiming,
        bodies: I,
        sink: &mut C,
    ) where
        B: EffectedBody + 'a,
        I: IntoIterator<Item = &'a mut B>,
        C: EffectorCallback + ?Sized,
    {
        let bounds = chain.bounding_box();
        for body in bodies {
            self.evaluate(chain, bounds, config, timing, body, sink);
        }
    }

    /// Wie `process`, aber für einen einzelnen Körper.
    /// Liefert die Box, in der der Körper erkannt wurde.
    pub fn process_body<B, C>(
        &mut self,
        chain: &BoxChain,
        config: &EffectorConfig,
        timing: TickTiming,
        body: &mut B,
        sink: &mut C,
    ) -> Option<BoxId>
    where
        B: EffectedBody + ?Sized,
        C: EffectorCallback + ?Sized,
    {
        self.evaluate(chain, chain.bounding_box(), config, timing, body, sink)
    }

    fn evaluate<B, C>(
        &mut self,
        chain: &BoxChain,
        bounds: Option<Bounds2D>,
        config: &EffectorConfig,
        timing: TickTiming,
        body: &mut B,
        sink: &mut C,
    ) -> Option<BoxId>
    where
        B: EffectedBody + ?Sized,
        C: EffectorCallback + ?Sized,
    {
        let id = body.id();
        let position = body.position();

        let candidate = bounds.is_some_and(|bb| bb.contains_point_exclusive(position));
        let track = if candidate {
            Some(self.tracked.entry(id).or_default())
        } else {
            self.tracked.get_mut(&id)
        };
        // Nie Kandidat gewesen
        let Some(track) = track else {
            return None;
        };

        // Erste passende Box gewinnt
        let hit = if candidate {
            chain
                .iter()
                .find(|b| b.inside_bounding_box(position) && b.inside_polygon(position))
        } else {
            None
        };

        match hit {
            Some(flow_box) => {
                let force = Self::compute_force(
                    flow_box,
                    config,
                    position,
                    track.time_inside,
                    timing.fixed_delta,
                );
                let info = TriggerInfo {
                    box_id: flow_box.id(),
                    force,
                    time_inside: track.time_inside,
                };
                match track.state {
                    TrackState::Outside => {
                        trace!("{:?} entered {}", id, flow_box.id());
                        sink.on_trigger_enter(id, &info);
                    }
                    TrackState::Inside => sink.on_trigger_stay(id, &info),
                }
                body.apply_impulse(force);
                track.state = TrackState::Inside;
                track.time_inside += timing.frame_delta;
                Some(flow_box.id())
            }
            None => {
                if track.state == TrackState::Inside {
                    trace!("{:?} left the field after {:.3}s", id, track.time_inside);
                    sink.on_trigger_exit(id);
                }
                *track = BodyTrack::default();
                None
            }
        }
    }
}
