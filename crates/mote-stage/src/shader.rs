//! The particle shader shared by every clock mesh.
//!
//! For each geometry point the shader decides whether the bound texture
//! lights it, then displaces and fades the particle according to the
//! show/fall progress uniforms:
//!
//! - `show_progress` pulls particles in from a scattered cloud onto the glyph.
//! - `fall_progress` drops them by up to `fall_distance` while fading out.

use std::f32::consts::TAU;

use glam::Vec3;
use mote_core::Rgb;

use crate::scene::{Point, PointGeometry, Uniforms};

/// Viewport height, in dots, at which the shimmer has full amplitude.
const SHIMMER_REFERENCE_DOTS: f32 = 96.0;

/// Output of the shader for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Mesh-local position.
    pub position: Vec3,
    pub color: Rgb,
    /// 0.0 is fully transparent.
    pub alpha: f32,
    /// Particle diameter in world units, group scale included.
    pub size: f32,
}

/// Shading parameters that do not change per mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleShader {
    /// Radius of the cloud particles assemble from.
    pub scatter_radius: f32,
    /// Sideways drift while falling.
    pub drift: f32,
    /// Idle shimmer amplitude.
    pub shimmer: f32,
}

impl Default for ParticleShader {
    fn default() -> Self {
        Self {
            scatter_radius: 1.2,
            drift: 0.6,
            shimmer: 0.015,
        }
    }
}

impl ParticleShader {
    pub fn shade(
        &self,
        geometry: &PointGeometry,
        point: &Point,
        uniforms: &Uniforms,
    ) -> Option<Fragment> {
        if !uniforms.texture.sample(point.u, point.v) {
            return None;
        }
        let show = uniforms.show_progress();
        let fall = uniforms.fall_progress();
        let alpha = show * (1.0 - fall);
        if alpha <= 0.0 {
            return None;
        }

        let mut pos = geometry.rest_position(point);
        let angle = point.seed * TAU;

        let scatter = (1.0 - show) * self.scatter_radius;
        pos.x += angle.cos() * scatter;
        pos.y += angle.sin() * scatter;
        pos.z += (point.seed - 0.5) * scatter;

        let speed = 0.5 + point.seed;
        pos.y -= fall * fall * uniforms.fall_distance * speed;
        pos.x += (point.seed - 0.5) * fall * self.drift;

        let density = (SHIMMER_REFERENCE_DOTS / uniforms.resolution.1.max(1.0)).min(1.0);
        pos.y += (uniforms.time * 1.7 + angle).sin() * self.shimmer * density;

        Some(Fragment {
            position: pos,
            color: uniforms.primary.lerp(uniforms.secondary, point.v),
            alpha,
            size: uniforms.particle_size * uniforms.scale,
        })
    }
}
