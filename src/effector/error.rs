// src/effector/error.rs
use super::{box_cell::BoxId, node::NodeId};
use crate::math::error::MathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectorError {
    #[error("Unknown box: {0}")]
    UnknownBox(BoxId),

    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    #[error("Direction ({x}, {y}) does not round to a cardinal direction")]
    NonCardinalDirection { x: f32, y: f32 },

    #[error("Expected {expected} shared nodes between {first} and {second}, found {actual}")]
    SharedNodeMismatch {
        first: BoxId,
        second: BoxId,
        expected: usize,
        actual: usize,
    },

    #[error("{parent} has {children} children; removal only supports linear chains")]
    BranchingChain { parent: BoxId, children: usize },

    #[error("Quad {index} references parent {parent}, which does not precede it")]
    InvalidParentIndex { index: usize, parent: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type EffectorResult<T> = Result<T, EffectorError>;
