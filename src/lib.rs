// ./src/lib.rs
pub mod debug;
pub mod effector;
pub mod math;
pub mod plugin;

pub mod prelude {
    pub use crate::effector::*;
    pub use crate::math::prelude::*;
    pub use crate::plugin::{
        EffectorTriggerEvent, FlowBody, PolygonAreaEffector, PolygonAreaEffectorPlugin,
    };
}
