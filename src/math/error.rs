// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },
}

pub type MathResult<T> = Result<T, MathError>;
