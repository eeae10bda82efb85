// src/plugin/systems.rs

use super::components::{FlowBody, PolygonAreaEffector, body_id};
use super::events::EffectorTriggerEvent;
use crate::effector::{BodyId, EffectedBody, TickTiming, TriggerEvent};
use bevy::prelude::*;

/// Körper aus Sicht des Evaluators.
struct BodyHandle<'a> {
    entity: Entity,
    position: Vec2,
    body: Mut<'a, FlowBody>,
}

impl EffectedBody for BodyHandle<'_> {
    fn id(&self) -> BodyId {
        body_id(self.entity)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.body.impulse += impulse;
    }
}

type BodyQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static Transform, &'static mut FlowBody), Without<PolygonAreaEffector>>;

fn matching_bodies(effector: &PolygonAreaEffector, bodies: &BodyQuery) -> Vec<Entity> {
    bodies
        .iter()
        .filter(|(_, _, body)| effector.config.matches_layer(body.layer))
        .map(|(entity, _, _)| entity)
        .collect()
}

/// Backt jede Kette und wertet alle passenden Körper aus.
///
/// Kraft skaliert mit dem festen Zeitschritt. Die Aufenthaltszeit wächst um
/// die virtuelle Zeit seit der letzten Auswertung desselben Effektors, damit
/// mehrere feste Schritte pro Frame sie nicht mehrfach zählen.
pub fn apply_area_effectors_system(
    fixed_time: Res<Time<Fixed>>,
    virtual_time: Res<Time<Virtual>>,
    mut effectors: Query<(Entity, &mut PolygonAreaEffector)>,
    mut bodies: BodyQuery,
    mut writer: EventWriter<EffectorTriggerEvent>,
) {
    let fixed_delta = fixed_time.timestep().as_secs_f32();
    let elapsed = virtual_time.elapsed();

    for (effector_entity, effector) in effectors.iter_mut() {
        let effector = effector.into_inner();
        if effector.chain.is_empty() {
            continue;
        }
        effector.chain.bake();

        let frame_delta = match effector.last_elapsed.replace(elapsed) {
            Some(previous) => elapsed.saturating_sub(previous).as_secs_f32(),
            // Erste Auswertung
            None => virtual_time.delta_seconds(),
        };
        let timing = TickTiming::new(fixed_delta, frame_delta);

        if !effector.initialized {
            let initial = matching_bodies(effector, &bodies);
            effector
                .evaluator
                .register_bodies(initial.iter().map(|e| body_id(*e)));
            info!(
                "Area effector {:?} initialized with {} bodies",
                effector_entity,
                initial.len()
            );
            if effector.config.bake_bodies {
                effector.baked_bodies = Some(initial);
            }
            effector.initialized = true;
        }

        let candidates = match &effector.baked_bodies {
            Some(baked) if effector.config.bake_bodies => baked.clone(),
            _ => matching_bodies(effector, &bodies),
        };

        let mut events: Vec<TriggerEvent> = Vec::new();
        for candidate in candidates {
            // Inzwischen despawnt
            let Ok((entity, transform, body)) = bodies.get_mut(candidate) else {
                continue;
            };
            let mut handle = BodyHandle {
                entity,
                position: transform.translation.truncate(),
                body,
            };
            effector.evaluator.process_body(
                &effector.chain,
                &effector.config,
                timing,
                &mut handle,
                &mut events,
            );
        }

        writer.send_batch(events.into_iter().map(|kind| EffectorTriggerEvent {
            effector: effector_entity,
            body: Entity::from_bits(kind.body().0),
            kind,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effector::{BoxChain, EffectorConfig};
    use approx::assert_relative_eq;
    use bevy::ecs::event::{Events, ManualEventReader};
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<EffectorTriggerEvent>()
            .insert_resource(Time::<Fixed>::from_seconds(0.02))
            .insert_resource(Time::<Virtual>::default())
            .add_systems(Update, apply_area_effectors_system);
        app
    }

    fn spawn_effector(app: &mut App, config: EffectorConfig) -> Entity {
        let mut chain = BoxChain::with_default_box(Vec2::ZERO);
        let root = chain.root().unwrap();
        chain.add_box(root, Vec2::X).unwrap();
        app.world
            .spawn(PolygonAreaEffector::new(chain, config).unwrap())
            .id()
    }

    fn drain(
        app: &App,
        reader: &mut ManualEventReader<EffectorTriggerEvent>,
    ) -> Vec<EffectorTriggerEvent> {
        let events = app.world.resource::<Events<EffectorTriggerEvent>>();
        reader.read(events).copied().collect()
    }

    #[test]
    fn test_body_inside_receives_impulse_and_events() {
        let mut app = test_app();
        let effector = spawn_effector(&mut app, EffectorConfig::default());
        let body = app
            .world
            .spawn((Transform::from_xyz(0.2, 0.1, 0.0), FlowBody::new(0)))
            .id();
        let mut reader = app
            .world
            .resource::<Events<EffectorTriggerEvent>>()
            .get_reader();

        app.update();

        let impulse = app.world.get::<FlowBody>(body).unwrap().impulse;
        assert!(impulse.x > 0.0);
        let events = drain(&app, &mut reader);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].effector, effector);
        assert_eq!(events[0].body, body);
        assert!(matches!(events[0].kind, TriggerEvent::Enter { .. }));

        app.world
            .resource_mut::<Time<Virtual>>()
            .advance_by(Duration::from_millis(100));
        app.update();
        let events = drain(&app, &mut reader);
        assert!(matches!(events[0].kind, TriggerEvent::Stay { .. }));
        let time_inside = app
            .world
            .get::<PolygonAreaEffector>(effector)
            .unwrap()
            .time_inside(body);
        assert!(time_inside > 0.0);

        app.world.get_mut::<Transform>(body).unwrap().translation = Vec3::new(20.0, 0.0, 0.0);
        app.update();
        let events = drain(&app, &mut reader);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, TriggerEvent::Exit { .. }));
        assert!(
            !app.world
                .get::<PolygonAreaEffector>(effector)
                .unwrap()
                .touching(body)
        );
    }

    #[test]
    fn test_time_inside_counts_each_virtual_second_once() {
        let mut app = App::new();
        app.add_event::<EffectorTriggerEvent>()
            .insert_resource(Time::<Fixed>::from_seconds(0.02))
            .insert_resource(Time::<Virtual>::default())
            .add_systems(FixedUpdate, apply_area_effectors_system);
        let effector = spawn_effector(&mut app, EffectorConfig::default());
        let body = app
            .world
            .spawn((Transform::from_xyz(0.2, 0.1, 0.0), FlowBody::new(0)))
            .id();

        // Ein langsamer Frame mit zwei festen Schritten
        app.world
            .resource_mut::<Time<Virtual>>()
            .advance_by(Duration::from_millis(40));
        app.world.run_schedule(FixedUpdate);
        app.world.run_schedule(FixedUpdate);

        let time_inside = |app: &App| {
            app.world
                .get::<PolygonAreaEffector>(effector)
                .unwrap()
                .time_inside(body)
        };
        assert_relative_eq!(time_inside(&app), 0.04, epsilon = 1e-6);

        // Ein Frame ohne festen Schritt, dann einer mit einem
        app.world
            .resource_mut::<Time<Virtual>>()
            .advance_by(Duration::from_millis(10));
        app.world
            .resource_mut::<Time<Virtual>>()
            .advance_by(Duration::from_millis(10));
        app.world.run_schedule(FixedUpdate);
        assert_relative_eq!(time_inside(&app), 0.06, epsilon = 1e-6);
    }

    #[test]
    fn test_layer_mask_filters_bodies() {
        let mut app = test_app();
        spawn_effector(&mut app, EffectorConfig::new().with_mask(0b01));
        let included = app
            .world
            .spawn((Transform::from_xyz(0.0, 0.0, 0.0), FlowBody::new(0)))
            .id();
        let excluded = app
            .world
            .spawn((Transform::from_xyz(0.0, 0.0, 0.0), FlowBody::new(1)))
            .id();

        app.update();

        assert_ne!(app.world.get::<FlowBody>(included).unwrap().impulse, Vec2::ZERO);
        assert_eq!(app.world.get::<FlowBody>(excluded).unwrap().impulse, Vec2::ZERO);
    }

    #[test]
    fn test_baked_body_list_ignores_late_spawns() {
        for (bake, expect_impulse) in [(true, false), (false, true)] {
            let mut app = test_app();
            spawn_effector(&mut app, EffectorConfig::new().with_bake_bodies(bake));
            app.update();

            let late = app
                .world
                .spawn((Transform::from_xyz(0.5, 0.0, 0.0), FlowBody::new(0)))
                .id();
            app.update();

            let impulse = app.world.get::<FlowBody>(late).unwrap().impulse;
            assert_eq!(impulse != Vec2::ZERO, expect_impulse, "bake_bodies = {}", bake);
        }
    }

    #[test]
    fn test_take_impulse_resets() {
        let mut body = FlowBody::new(0);
        body.impulse = Vec2::new(1.0, 2.0);
        assert_eq!(body.take_impulse(), Vec2::new(1.0, 2.0));
        assert_eq!(body.impulse, Vec2::ZERO);
    }
}
