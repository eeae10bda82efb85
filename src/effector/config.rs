// src/effector/config.rs

use super::error::{EffectorError, EffectorResult};
use serde::{Deserialize, Serialize};

/// Welche Kraftkomponenten auf Körper wirken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceType {
    /// Beide Achsen
    #[default]
    XY,
    /// Nur vertikal, X wird genullt
    Y,
    /// Nur horizontal, Y wird genullt
    X,
}

/// Konfiguration eines Flächeneffektors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectorConfig {
    /// Layer-Maske für die Körperauswahl. Wird nur von der Körperquelle
    /// ausgewertet, nie vom Kern.
    pub mask: u32,
    /// Grundkraft
    pub force: f32,
    /// Zusätzliche Kraft pro Sekunde Aufenthalt im Feld.
    pub force_over_time: f32,
    pub force_type: ForceType,
    /// Körperliste einmal beim Start erfassen statt jeden Tick neu.
    pub bake_bodies: bool,
}

impl Default for EffectorConfig {
    fn default() -> Self {
        Self {
            mask: u32::MAX,
            force: 1.0,
            force_over_time: 0.0,
            force_type: ForceType::XY,
            bake_bodies: true,
        }
    }
}

impl EffectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mask(mut self, mask: u32) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_force(mut self, force: f32) -> Self {
        self.force = force;
        self
    }

    pub fn with_force_over_time(mut self, force_over_time: f32) -> Self {
        self.force_over_time = force_over_time;
        self
    }

    pub fn with_force_type(mut self, force_type: ForceType) -> Self {
        self.force_type = force_type;
        self
    }

    pub fn with_bake_bodies(mut self, bake_bodies: bool) -> Self {
        self.bake_bodies = bake_bodies;
        self
    }

    /// Prüft ob ein Körper auf `layer` (0..32) von der Maske erfasst wird.
    pub fn matches_layer(&self, layer: u8) -> bool {
        layer < 32 && self.mask & (1 << layer) != 0
    }

    pub fn validate(&self) -> EffectorResult<()> {
        if !self.force.is_finite() {
            return Err(EffectorError::InvalidConfiguration {
                message: format!("force must be finite, got {}", self.force),
            });
        }
        if !self.force_over_time.is_finite() {
            return Err(EffectorError::InvalidConfiguration {
                message: format!(
                    "force_over_time must be finite, got {}",
                    self.force_over_time
                ),
            });
        }
        Ok(())
    }
}
