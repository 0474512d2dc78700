//! Scene graph: one scene owns one group, which owns the point meshes.

use std::sync::Arc;

use glam::Vec3;
use mote_core::Rgb;
use mote_glyphs::Texture;

use crate::math::hash01;
use crate::shader::ParticleShader;

/// One particle position in a mesh, in texture space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// 0.0 at the left edge, 1.0 at the right.
    pub u: f32,
    /// 0.0 at the top edge, 1.0 at the bottom.
    pub v: f32,
    /// Per-point random value in 0.0-1.0.
    pub seed: f32,
}

/// A regular grid of points covering a `width` x `height` rectangle
/// centered on the mesh origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGeometry {
    pub width: f32,
    pub height: f32,
    points: Vec<Point>,
}

impl PointGeometry {
    pub fn grid(columns: usize, rows: usize, width: f32, height: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let points = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| (col, row)))
            .enumerate()
            .map(|(i, (col, row))| Point {
                u: (col as f32 + 0.5) / columns as f32,
                v: (row as f32 + 0.5) / rows as f32,
                seed: hash01(i as u32),
            })
            .collect();
        Self {
            width,
            height,
            points,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mesh-local position of a point at rest.
    pub fn rest_position(&self, point: &Point) -> Vec3 {
        Vec3::new(
            (point.u - 0.5) * self.width,
            (0.5 - point.v) * self.height,
            0.0,
        )
    }
}

/// Animated parameters consumed by the particle shader. Each mesh owns its
/// own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniforms {
    /// Viewport size in dots.
    pub resolution: (f32, f32),
    /// Seconds since the stage started.
    pub time: f32,
    /// Display scale of the owning group.
    pub scale: f32,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub particle_size: f32,
    pub fall_distance: f32,
    show_progress: f32,
    fall_progress: f32,
    pub texture: Arc<Texture>,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            resolution: (1.0, 1.0),
            time: 0.0,
            scale: 1.0,
            primary: Rgb::WHITE,
            secondary: Rgb::WHITE,
            particle_size: 0.02,
            fall_distance: 1.5,
            show_progress: 0.0,
            fall_progress: 0.0,
            texture: Arc::new(Texture::blank()),
        }
    }
}

impl Uniforms {
    pub fn show_progress(&self) -> f32 {
        self.show_progress
    }

    pub fn set_show_progress(&mut self, value: f32) {
        self.show_progress = value.clamp(0.0, 1.0);
    }

    pub fn fall_progress(&self) -> f32 {
        self.fall_progress
    }

    pub fn set_fall_progress(&mut self, value: f32) {
        self.fall_progress = value.clamp(0.0, 1.0);
    }
}

/// Shader plus uniforms. Cloning shares the shader but copies the uniforms,
/// so every clone animates independently.
#[derive(Debug, Clone)]
pub struct Material {
    pub uniforms: Uniforms,
    shader: Arc<ParticleShader>,
}

impl Material {
    pub fn new(shader: Arc<ParticleShader>, uniforms: Uniforms) -> Self {
        Self { uniforms, shader }
    }

    pub fn shader(&self) -> &ParticleShader {
        &self.shader
    }

    pub fn shares_shader_with(&self, other: &Material) -> bool {
        Arc::ptr_eq(&self.shader, &other.shader)
    }
}

/// A renderable set of particles.
#[derive(Debug, Clone)]
pub struct Mesh {
    geometry: Arc<PointGeometry>,
    pub material: Material,
    /// Offset inside the parent group, before group scaling.
    pub position: Vec3,
    /// Whether the mesh is drawn at all.
    pub visible: bool,
}

impl Mesh {
    pub fn new(geometry: Arc<PointGeometry>, material: Material) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            visible: true,
        }
    }

    pub fn geometry(&self) -> &PointGeometry {
        &self.geometry
    }
}

/// An ordered collection of meshes sharing one transform.
#[derive(Debug, Clone)]
pub struct Group {
    pub position: Vec3,
    /// Uniform scale applied to every child.
    pub scale: f32,
    meshes: Vec<Mesh>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            meshes: Vec::new(),
        }
    }
}

impl Group {
    /// Append a mesh and return its index.
    pub fn add(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut Mesh> {
        self.meshes.get_mut(index)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Horizontal extent `(min_x, max_x)` of all meshes in group-local
    /// units, or `None` when empty.
    pub fn bounds_x(&self) -> Option<(f32, f32)> {
        self.meshes
            .iter()
            .map(|m| {
                let half = m.geometry.width / 2.0;
                (m.position.x - half, m.position.x + half)
            })
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    /// World position of a mesh-local point.
    pub fn to_world(&self, mesh: &Mesh, local: Vec3) -> Vec3 {
        self.position + (mesh.position + local) * self.scale
    }
}

/// Ambient light added on top of the base particle brightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { intensity: 0.25 }
    }
}

/// Brightness of particles with no light in the scene.
const BASE_LIGHT: f32 = 0.8;

/// Everything the stage draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Rgb,
    pub ambient: Option<AmbientLight>,
    /// The clock face: digit and separator meshes.
    pub timer: Group,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Rgb::BLACK,
            ambient: None,
            timer: Group::default(),
        }
    }
}

impl Scene {
    /// Multiplier applied to particle colors.
    pub fn light_factor(&self) -> f32 {
        BASE_LIGHT + self.ambient.map_or(0.0, |a| a.intensity)
    }

    /// Apply `f` to the uniforms of every mesh.
    pub fn for_each_uniforms(&mut self, mut f: impl FnMut(&mut Uniforms)) {
        for mesh in self.timer.meshes_mut() {
            f(&mut mesh.material.uniforms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(width: f32) -> Mesh {
        Mesh::new(
            Arc::new(PointGeometry::grid(2, 2, width, 1.0)),
            Material::new(Arc::new(ParticleShader::default()), Uniforms::default()),
        )
    }

    #[test]
    fn test_grid_points_cover_unit_square() {
        let g = PointGeometry::grid(4, 3, 2.0, 1.0);
        assert_eq!(g.points().len(), 12);
        assert!(g.points().iter().all(|p| p.u > 0.0 && p.u < 1.0));
        assert!(g.points().iter().all(|p| p.v > 0.0 && p.v < 1.0));
        let top_left = g.rest_position(&g.points()[0]);
        assert!(top_left.x < 0.0 && top_left.y > 0.0);
    }

    #[test]
    fn test_progress_setters_clamp() {
        let mut u = Uniforms::default();
        u.set_show_progress(1.5);
        u.set_fall_progress(-0.2);
        assert_eq!(u.show_progress(), 1.0);
        assert_eq!(u.fall_progress(), 0.0);
    }

    #[test]
    fn test_cloned_material_is_independent() {
        let base = Material::new(Arc::new(ParticleShader::default()), Uniforms::default());
        let mut clone = base.clone();
        clone.uniforms.set_show_progress(0.5);
        assert_eq!(base.uniforms.show_progress(), 0.0);
        assert!(clone.shares_shader_with(&base));
    }

    #[test]
    fn test_group_bounds() {
        let mut group = Group::default();
        assert!(group.bounds_x().is_none());
        let mut a = mesh(1.0);
        a.position.x = -2.0;
        let mut b = mesh(2.0);
        b.position.x = 3.0;
        group.add(a);
        let index = group.add(b);
        assert_eq!(index, 1);
        assert_eq!(group.bounds_x(), Some((-2.5, 4.0)));
    }

    #[test]
    fn test_light_factor() {
        let mut scene = Scene::default();
        let dark = scene.light_factor();
        scene.ambient = Some(AmbientLight::default());
        assert!(scene.light_factor() > dark);
    }
}
