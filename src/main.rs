// ./src/main.rs
use bevy::prelude::*;
use polygon_area_effector::{
    debug::visualization::chain::draw_chain_system, plugin::PolygonAreaEffectorPlugin,
};

mod setup;

use setup::DemoScenePlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(Time::<Fixed>::from_hz(50.0))
        .add_plugins(PolygonAreaEffectorPlugin)
        .add_plugins(DemoScenePlugin)
        .add_systems(Update, draw_chain_system)
        .run();
}
