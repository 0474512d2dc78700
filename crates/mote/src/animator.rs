//! Progress tweens for the clock meshes.
//!
//! Each mesh has two animated scalars: `show_progress` (particles assemble)
//! and `fall_progress` (particles fall away). At most one tween runs per
//! mesh and scalar; starting a new one replaces the old.

use std::time::Duration;

use mote_core::Easing;
use mote_stage::Group;

/// Length of the fall-away animation.
pub const HIDE_DURATION: Duration = Duration::from_millis(1250);

/// Length of the assemble animation.
pub const SHOW_DURATION: Duration = Duration::from_millis(700);

/// Which progress scalar a tween drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Show,
    Fall,
}

#[derive(Debug, Clone)]
struct Tween {
    mesh: usize,
    channel: Channel,
    duration: Duration,
    delay: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    /// Eased progress, or `None` while still waiting out the delay.
    fn progress(&self) -> Option<f32> {
        let active = self.elapsed.checked_sub(self.delay)?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        let t = (active.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        Some(self.easing.apply(t))
    }

    fn is_finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }
}

/// Runs show/fall tweens against the meshes of a group.
#[derive(Debug, Default)]
pub struct Animator {
    tweens: Vec<Tween>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `mesh` fall apart after `delay`. When done the mesh stops
    /// rendering and its fall progress returns to 0.
    pub fn hide(&mut self, group: &mut Group, mesh: usize, delay: Duration) {
        let Some(target) = group.mesh_mut(mesh) else {
            tracing::warn!(mesh, "hide requested for unknown mesh");
            return;
        };
        target.material.uniforms.set_fall_progress(0.0);
        self.start(Tween {
            mesh,
            channel: Channel::Fall,
            duration: HIDE_DURATION,
            delay,
            elapsed: Duration::ZERO,
            easing: Easing::QuadInOut,
        });
    }

    /// Render `mesh` immediately and assemble its particles.
    ///
    /// Showing supersedes a pending fall on the same mesh.
    pub fn show(&mut self, group: &mut Group, mesh: usize) {
        let Some(target) = group.mesh_mut(mesh) else {
            tracing::warn!(mesh, "show requested for unknown mesh");
            return;
        };
        target.visible = true;
        target.material.uniforms.set_show_progress(0.0);
        target.material.uniforms.set_fall_progress(0.0);
        self.cancel(mesh, Channel::Fall);
        self.start(Tween {
            mesh,
            channel: Channel::Show,
            duration: SHOW_DURATION,
            delay: Duration::ZERO,
            elapsed: Duration::ZERO,
            easing: Easing::Linear,
        });
    }

    fn start(&mut self, tween: Tween) {
        self.cancel(tween.mesh, tween.channel);
        self.tweens.push(tween);
    }

    fn cancel(&mut self, mesh: usize, channel: Channel) {
        self.tweens
            .retain(|t| !(t.mesh == mesh && t.channel == channel));
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Step every tween by `dt` and write the results into `group`.
    pub fn advance(&mut self, group: &mut Group, dt: Duration) {
        self.tweens.retain_mut(|tween| {
            tween.elapsed += dt;
            let Some(mesh) = group.mesh_mut(tween.mesh) else {
                return false;
            };
            let uniforms = &mut mesh.material.uniforms;
            if let Some(value) = tween.progress() {
                match tween.channel {
                    Channel::Show => uniforms.set_show_progress(value),
                    Channel::Fall => uniforms.set_fall_progress(value),
                }
            }
            if !tween.is_finished() {
                return true;
            }
            if tween.channel == Channel::Fall {
                mesh.visible = false;
                uniforms.set_fall_progress(0.0);
            }
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mote_stage::{Material, Mesh, ParticleShader, PointGeometry, Uniforms};
    use std::sync::Arc;

    fn group(meshes: usize) -> Group {
        let geometry = Arc::new(PointGeometry::grid(2, 2, 1.0, 1.0));
        let material = Material::new(Arc::new(ParticleShader::default()), Uniforms::default());
        let mut group = Group::default();
        for _ in 0..meshes {
            let mut mesh = Mesh::new(Arc::clone(&geometry), material.clone());
            mesh.material.uniforms.set_show_progress(1.0);
            group.add(mesh);
        }
        group
    }

    fn uniforms(group: &Group, mesh: usize) -> &Uniforms {
        &group.mesh(mesh).unwrap().material.uniforms
    }

    #[test]
    fn test_hide_waits_for_delay_then_falls() {
        let mut g = group(1);
        let mut animator = Animator::new();
        animator.hide(&mut g, 0, Duration::from_millis(300));

        animator.advance(&mut g, Duration::from_millis(200));
        assert_eq!(uniforms(&g, 0).fall_progress(), 0.0);

        animator.advance(&mut g, Duration::from_millis(725));
        let mid = uniforms(&g, 0).fall_progress();
        assert!((mid - 0.5).abs() < 1e-3, "halfway with in-out easing, got {mid}");
        assert!(g.mesh(0).unwrap().visible);
    }

    #[test]
    fn test_hide_completion_resets_fall_and_hides() {
        let mut g = group(1);
        let mut animator = Animator::new();
        animator.hide(&mut g, 0, Duration::ZERO);
        for _ in 0..100 {
            animator.advance(&mut g, Duration::from_millis(16));
            let fall = uniforms(&g, 0).fall_progress();
            assert!((0.0..=1.0).contains(&fall));
        }
        assert!(!g.mesh(0).unwrap().visible);
        assert_eq!(uniforms(&g, 0).fall_progress(), 0.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_show_renders_immediately_and_is_linear() {
        let mut g = group(1);
        g.mesh_mut(0).unwrap().visible = false;
        let mut animator = Animator::new();
        animator.show(&mut g, 0);
        assert!(g.mesh(0).unwrap().visible);
        assert_eq!(uniforms(&g, 0).show_progress(), 0.0);

        animator.advance(&mut g, Duration::from_millis(350));
        assert!((uniforms(&g, 0).show_progress() - 0.5).abs() < 1e-3);

        animator.advance(&mut g, Duration::from_secs(5));
        assert_eq!(uniforms(&g, 0).show_progress(), 1.0);
        assert!(g.mesh(0).unwrap().visible);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_new_tween_replaces_in_flight() {
        let mut g = group(1);
        let mut animator = Animator::new();
        animator.show(&mut g, 0);
        animator.advance(&mut g, Duration::from_millis(500));
        animator.show(&mut g, 0);
        assert_eq!(uniforms(&g, 0).show_progress(), 0.0);
        animator.advance(&mut g, Duration::from_millis(350));
        assert!((uniforms(&g, 0).show_progress() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_show_cancels_pending_fall() {
        let mut g = group(1);
        let mut animator = Animator::new();
        animator.hide(&mut g, 0, Duration::from_millis(100));
        animator.show(&mut g, 0);
        assert!(animator.tweens.iter().all(|t| t.channel == Channel::Show));
        animator.advance(&mut g, Duration::from_secs(3));
        assert!(g.mesh(0).unwrap().visible);
    }

    #[test]
    fn test_meshes_animate_independently() {
        let mut g = group(2);
        let mut animator = Animator::new();
        animator.hide(&mut g, 0, Duration::ZERO);
        animator.show(&mut g, 1);
        animator.advance(&mut g, Duration::from_millis(2000));
        assert!(!g.mesh(0).unwrap().visible);
        assert!(g.mesh(1).unwrap().visible);
        assert_eq!(uniforms(&g, 1).show_progress(), 1.0);
    }

    #[test]
    fn test_unknown_mesh_is_ignored() {
        let mut g = group(1);
        let mut animator = Animator::new();
        animator.hide(&mut g, 7, Duration::ZERO);
        animator.show(&mut g, 7);
        assert!(animator.is_idle());
    }
}
