//! Terminal stage for the mote particle clock.
//!
//! A [`Stage`] owns a [`Scene`] (one group of particle meshes), a camera on
//! the +Z axis and a [`Renderer`] that rasterizes particles into a ratatui
//! buffer. Each frame the stage advances its clock, updates the orbit
//! controls, runs the caller's tick hook and draws.

mod camera;
mod math;
mod renderer;
mod scene;
mod shader;
mod stage;

pub use camera::{Camera, CameraProjection, OrbitControls};
pub use glam::Vec3;
pub use renderer::{CELL_ASPECT, PixelRatio, RasterMode, Renderer};
pub use scene::{AmbientLight, Group, Material, Mesh, Point, PointGeometry, Scene, Uniforms};
pub use shader::{Fragment, ParticleShader};
pub use stage::{FrameInfo, Stage, StageError, StageOptions, Tick};
