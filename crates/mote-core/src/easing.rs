//! Easing curves for progress tweens.

/// Maps linear progress in 0.0-1.0 onto an eased curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
}

impl Easing {
    /// Apply the curve. Input is clamped, so the output always stays in 0.0-1.0.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < f32::EPSILON, "{easing:?}");
        }
    }

    #[test]
    fn test_output_stays_in_range() {
        for easing in ALL {
            for i in -10..=30 {
                let v = easing.apply(i as f32 / 20.0);
                assert!((0.0..=1.0).contains(&v), "{easing:?} produced {v}");
            }
        }
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let a = Easing::QuadInOut.apply(0.25);
        let b = Easing::QuadInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }
}
