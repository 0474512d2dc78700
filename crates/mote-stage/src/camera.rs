//! Cameras and orbit controls.

use glam::{Mat4, Quat, Vec3};

/// Projection parameters of a [`Camera`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraProjection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        aspect: f32,
    },
    Orthographic {
        /// Height of the view volume in world units.
        view_height: f32,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    },
}

/// A camera on the +Z axis looking at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Distance from the origin along +Z.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    projection: CameraProjection,
}

impl Camera {
    pub fn perspective(fov_y_degrees: f32, distance: f32) -> Self {
        Self {
            distance,
            near: 0.1,
            far: 100.0,
            projection: CameraProjection::Perspective {
                fov_y: fov_y_degrees.to_radians(),
                aspect: 1.0,
            },
        }
    }

    pub fn orthographic(view_height: f32, distance: f32) -> Self {
        let half = view_height / 2.0;
        Self {
            distance,
            near: 0.1,
            far: 100.0,
            projection: CameraProjection::Orthographic {
                view_height,
                left: -half,
                right: half,
                top: half,
                bottom: -half,
            },
        }
    }

    pub fn projection(&self) -> CameraProjection {
        self.projection
    }

    /// Update the projection for a viewport of the given width/height ratio.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        let new_aspect = if new_aspect.is_finite() && new_aspect > 0.0 {
            new_aspect
        } else {
            1.0
        };
        match &mut self.projection {
            CameraProjection::Perspective { aspect, .. } => *aspect = new_aspect,
            CameraProjection::Orthographic {
                view_height,
                left,
                right,
                top,
                bottom,
            } => {
                let half_h = *view_height / 2.0;
                let half_w = half_h * new_aspect;
                *left = -half_w;
                *right = half_w;
                *top = half_h;
                *bottom = -half_h;
            }
        }
    }

    pub fn aspect(&self) -> f32 {
        match self.projection {
            CameraProjection::Perspective { aspect, .. } => aspect,
            CameraProjection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => (right - left) / (top - bottom),
        }
    }

    /// View matrix of the camera orbited `yaw` radians around the Y axis.
    pub fn view_matrix(&self, yaw: f32) -> Mat4 {
        let eye = Quat::from_rotation_y(yaw) * Vec3::new(0.0, 0.0, self.distance);
        Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            CameraProjection::Perspective { fov_y, aspect } => {
                Mat4::perspective_rh(fov_y, aspect, self.near, self.far)
            }
            CameraProjection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far),
        }
    }

    /// Project a world point to normalized device coordinates.
    ///
    /// Returns `(x, y, depth)` with x/y in -1.0..=1.0 when visible, or `None`
    /// when the point is outside the near/far range. `yaw` orbits the camera
    /// around the Y axis.
    pub fn project(&self, world: Vec3, yaw: f32) -> Option<Vec3> {
        let view = self.view_matrix(yaw).transform_point3(world);
        let depth = -view.z;
        if depth < self.near || depth > self.far {
            return None;
        }
        let ndc = self.projection_matrix().project_point3(view);
        Some(Vec3::new(ndc.x, ndc.y, depth))
    }

    /// Screen pixels covered by one world unit at `depth`, for a viewport
    /// `pixel_height` pixels tall.
    pub fn pixels_per_unit(&self, depth: f32, pixel_height: f32) -> f32 {
        match self.projection {
            CameraProjection::Perspective { fov_y, .. } => {
                let visible = 2.0 * depth.max(self.near) * (fov_y / 2.0).tan();
                pixel_height / visible
            }
            CameraProjection::Orthographic { top, bottom, .. } => pixel_height / (top - bottom),
        }
    }
}

/// Damped orbit around the Y axis, driven by keyboard nudges.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    yaw: f32,
    target_yaw: f32,
    /// Higher values settle faster.
    pub damping: f32,
    /// Largest orbit angle in radians either way.
    pub max_yaw: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            target_yaw: 0.0,
            damping: 6.0,
            max_yaw: 0.8,
        }
    }
}

impl OrbitControls {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn nudge(&mut self, radians: f32) {
        self.target_yaw = (self.target_yaw + radians).clamp(-self.max_yaw, self.max_yaw);
    }

    pub fn reset(&mut self) {
        self.target_yaw = 0.0;
    }

    /// Ease the current yaw towards its target.
    pub fn update(&mut self, dt_secs: f32) {
        let blend = 1.0 - (-self.damping * dt_secs.max(0.0)).exp();
        self.yaw += (self.target_yaw - self.yaw) * blend;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        for camera in [Camera::perspective(40.0, 10.0), Camera::orthographic(6.0, 10.0)] {
            let ndc = camera.project(Vec3::ZERO, 0.0).unwrap();
            assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
            assert!((ndc.z - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let camera = Camera::perspective(40.0, 10.0);
        assert!(camera.project(Vec3::new(0.0, 0.0, 11.0), 0.0).is_none());
    }

    #[test]
    fn test_orthographic_frustum_tracks_aspect() {
        let mut camera = Camera::orthographic(6.0, 10.0);
        camera.set_aspect(2.0);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);
        let edge = camera.project(Vec3::new(6.0, 3.0, 0.0), 0.0).unwrap();
        assert!((edge.x - 1.0).abs() < 1e-6);
        assert!((edge.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_perspective_aspect_squeezes_x() {
        let mut camera = Camera::perspective(40.0, 10.0);
        let before = camera.project(Vec3::new(1.0, 1.0, 0.0), 0.0).unwrap();
        camera.set_aspect(2.0);
        let after = camera.project(Vec3::new(1.0, 1.0, 0.0), 0.0).unwrap();
        assert!((after.x - before.x / 2.0).abs() < 1e-5);
        assert!((after.y - before.y).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_orbits_around_origin() {
        let camera = Camera::orthographic(6.0, 10.0);
        let quarter = std::f32::consts::FRAC_PI_2;
        // Orbiting a quarter turn brings a point on +X to the view center.
        let p = camera.project(Vec3::new(1.0, 0.0, 0.0), quarter).unwrap();
        assert!(p.x.abs() < 1e-5);
        assert!((p.z - 9.0).abs() < 1e-5);

        let p = camera.project(Vec3::new(0.0, 0.0, 1.0), quarter).unwrap();
        assert!(p.x < 0.0);
    }

    #[test]
    fn test_invalid_aspect_falls_back() {
        let mut camera = Camera::perspective(40.0, 10.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect(), 1.0);
        camera.set_aspect(0.0);
        assert_eq!(camera.aspect(), 1.0);
    }

    #[test]
    fn test_orbit_settles_within_bounds() {
        let mut controls = OrbitControls::default();
        controls.nudge(5.0);
        for _ in 0..200 {
            controls.update(1.0 / 30.0);
        }
        assert!((controls.yaw() - controls.max_yaw).abs() < 1e-3);
        controls.reset();
        for _ in 0..200 {
            controls.update(1.0 / 30.0);
        }
        assert!(controls.yaw().abs() < 1e-3);
    }
}
