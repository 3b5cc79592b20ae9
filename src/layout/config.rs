//! Simulation parameters and the report produced by a convergence run.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Parameters for [`ForceLayout::converge`].
///
/// Deserializes from a partial object; missing fields take their defaults.
///
/// [`ForceLayout::converge`]: super::ForceLayout::converge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvergeConfig {
    /// Velocity damping applied every step (default: 0.15).
    pub damping: f32,
    /// Spring constant for edge attraction (default: 0.2).
    pub spring_constant: f32,
    /// Stop once a step's energy is at or below this (default: 0.003).
    pub target_energy: f64,
    /// Hard cap on steps per run (default: 10_000).
    pub max_iterations: u32,
}

impl Default for ConvergeConfig {
    fn default() -> Self {
        Self {
            damping: 0.15,
            spring_constant: 0.2,
            target_energy: 0.003,
            max_iterations: 10_000,
        }
    }
}

impl ConvergeConfig {
    /// Check that the driver can run with these parameters.
    ///
    /// Damping of 1 or more is accepted: such runs may never settle, and the
    /// iteration cap is what bounds them.
    pub fn validate(&self) -> Result<()> {
        if !self.damping.is_finite() || self.damping <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "damping must be a positive number, got {}",
                self.damping
            )));
        }
        if !self.spring_constant.is_finite() {
            return Err(LayoutError::InvalidConfig(format!(
                "spring constant must be finite, got {}",
                self.spring_constant
            )));
        }
        if !self.target_energy.is_finite() || self.target_energy < 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "target energy must be a non-negative number, got {}",
                self.target_energy
            )));
        }
        if self.max_iterations == 0 {
            return Err(LayoutError::InvalidConfig(
                "max iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a convergence run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergeReport {
    /// Steps taken.
    pub iterations: u32,
    /// Energy after the last step.
    pub energy: f64,
    /// Whether the target energy was reached before the cap.
    pub converged: bool,
}
