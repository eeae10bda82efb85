// ./src/setup.rs
use bevy::prelude::*;
use polygon_area_effector::{
    debug::visualization::chain::ChainVisual,
    effector::{BoxChain, EffectorConfig, EffectorResult, TriggerEvent},
    plugin::{EffectorTriggerEvent, FlowBody, PolygonAreaEffector, apply_area_effectors_system},
};
use rand::Rng;

const BODY_COUNT: usize = 40;
const BODY_RADIUS: f32 = 0.12;
const WORLD_HALF_EXTENT: f32 = 8.0;
/// Anteil der Geschwindigkeit, der pro Sekunde verloren geht
const DAMPING: f32 = 0.6;
/// Welteinheiten pro Pixel der orthografischen Projektion
const CAMERA_SCALE: f32 = 1.0 / 40.0;

/// Geschwindigkeit eines Demo-Körpers. Ersetzt hier eine echte Physik-Engine.
#[derive(Component, Debug, Default)]
pub struct DemoVelocity(pub Vec2);

pub struct DemoScenePlugin;

impl Plugin for DemoScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene)
            .add_systems(
                FixedUpdate,
                integrate_demo_bodies_system.after(apply_area_effectors_system),
            )
            .add_systems(Update, (draw_bodies_system, log_trigger_events_system));
    }
}

/// U-förmiger Kanal: zwei Boxen nach rechts, zwei nach oben, zwei nach links.
fn build_channel() -> EffectorResult<BoxChain> {
    let mut chain = BoxChain::new();
    let mut last = chain.generate_default_box(Vec2::new(-2.0, -2.0));
    for direction in [Vec2::X, Vec2::X, Vec2::Y, Vec2::Y, Vec2::NEG_X, Vec2::NEG_X] {
        last = chain.add_box(last, direction)?;
    }
    chain.bake();
    Ok(chain)
}

pub fn setup_scene(mut commands: Commands) {
    // Kamera
    let mut camera = Camera2dBundle::default();
    camera.projection.scale = CAMERA_SCALE;
    commands.spawn(camera);

    let config = EffectorConfig::new()
        .with_force(0.8)
        .with_force_over_time(0.2)
        .with_mask(0b1)
        .with_bake_bodies(true);

    match build_channel().and_then(|chain| PolygonAreaEffector::new(chain, config)) {
        Ok(effector) => {
            info!(
                "Channel area: {:.2}, linear length: {:.2}",
                effector.chain.total_area(),
                effector.chain.linear_length()
            );
            commands.spawn((effector, ChainVisual::default()));
        }
        Err(err) => error!("Failed to build demo channel: {}", err),
    }

    let mut rng = rand::rng();
    for i in 0..BODY_COUNT {
        let position = Vec2::new(
            rng.random_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
            rng.random_range(-WORLD_HALF_EXTENT..WORLD_HALF_EXTENT),
        );
        // Jeder vierte Körper liegt auf Layer 1 und wird ignoriert
        let layer = if i % 4 == 0 { 1 } else { 0 };
        commands.spawn((
            Transform::from_translation(position.extend(0.0)),
            FlowBody::new(layer),
            DemoVelocity::default(),
        ));
    }
}

pub fn integrate_demo_bodies_system(
    time: Res<Time>,
    mut query: Query<(&mut Transform, &mut FlowBody, &mut DemoVelocity)>,
) {
    let dt = time.delta_seconds();
    for (mut transform, mut body, mut velocity) in query.iter_mut() {
        velocity.0 += body.take_impulse();
        velocity.0 *= (1.0 - DAMPING * dt).max(0.0);
        transform.translation += (velocity.0 * dt).extend(0.0);

        // Körper, die das Feld verlassen, kommen auf der anderen Seite zurück
        for axis in 0..2 {
            let v = &mut transform.translation[axis];
            if *v > WORLD_HALF_EXTENT {
                *v = -WORLD_HALF_EXTENT;
            } else if *v < -WORLD_HALF_EXTENT {
                *v = WORLD_HALF_EXTENT;
            }
        }
    }
}

fn draw_bodies_system(query: Query<(&Transform, &FlowBody)>, mut gizmos: Gizmos) {
    for (transform, body) in query.iter() {
        let color = if body.layer == 0 {
            Color::ORANGE
        } else {
            Color::GRAY
        };
        gizmos.circle_2d(transform.translation.truncate(), BODY_RADIUS, color);
    }
}

fn log_trigger_events_system(mut events: EventReader<EffectorTriggerEvent>) {
    for event in events.read() {
        match event.kind {
            TriggerEvent::Enter { info, .. } => {
                debug!("{:?} entered {} with force {:?}", event.body, info.box_id, info.force)
            }
            TriggerEvent::Exit { .. } => debug!("{:?} left the channel", event.body),
            TriggerEvent::Stay { .. } => {}
        }
    }
}
