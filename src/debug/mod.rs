// src/debug/mod.rs
pub mod visualization;
