// src/effector/mod.rs

//! Flächeneffektor: eine Kette aus Vierecken, die Körper entlang der
//! Flussrichtung der jeweiligen Box schiebt.

pub mod box_cell;
pub mod callback;
pub mod chain;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod node;

pub use self::box_cell::{BoxId, FlowBox};
pub use self::callback::{BodyId, EffectedBody, EffectorCallback, TriggerEvent, TriggerInfo};
pub use self::chain::{BoxChain, DEFAULT_BOX_SIZE, QuadDescriptor};
pub use self::config::{EffectorConfig, ForceType};
pub use self::error::{EffectorError, EffectorResult};
pub use self::evaluator::{BodyTrack, ForceEvaluator, TickTiming, TrackState};
pub use self::node::{NodeArena, NodeId};
