//! Tunable parameters exposed to the debug panel.

/// Inclusive numeric range with an edit step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Move `value` by `steps` increments, snapped to the step grid.
    pub fn step_by(&self, value: f32, steps: i32) -> f32 {
        let index = (value / self.step).round() as i64 + steps as i64;
        self.clamp(index as f32 * self.step)
    }
}

/// Particle size, in world units.
pub const PARTICLE_SIZE: Bounds = Bounds::new(0.001, 0.1, 0.001);

/// Fall distance, in world units.
pub const FALL_DISTANCE: Bounds = Bounds::new(0.3, 5.0, 0.1);

/// Hue rotation applied per color edit step.
pub const HUE_STEP_DEGREES: f32 = 15.0;

/// A panel-editable field of [`crate::ClockConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    Background,
    Primary,
    Secondary,
    ParticleSize,
    FallDistance,
}

impl Param {
    pub const ALL: [Param; 5] = [
        Param::Background,
        Param::Primary,
        Param::Secondary,
        Param::ParticleSize,
        Param::FallDistance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Param::Background => "background",
            Param::Primary => "primary",
            Param::Secondary => "secondary",
            Param::ParticleSize => "particle size",
            Param::FallDistance => "fall distance",
        }
    }

    /// Numeric bounds, `None` for colors.
    pub fn bounds(self) -> Option<Bounds> {
        match self {
            Param::ParticleSize => Some(PARTICLE_SIZE),
            Param::FallDistance => Some(FALL_DISTANCE),
            Param::Background | Param::Primary | Param::Secondary => None,
        }
    }

    /// Next parameter, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous parameter, wrapping around.
    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
