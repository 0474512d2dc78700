//! Stage bootstrap: scene, camera, renderer and the per-frame hook.

use std::time::Duration;

use ratatui::{buffer::Buffer, layout::Rect};
use thiserror::Error;

use crate::camera::{Camera, OrbitControls};
use crate::renderer::{CELL_ASPECT, PixelRatio, RasterMode, Renderer};
use crate::scene::{AmbientLight, Scene};

/// Vertical field of view of the perspective camera, in degrees.
const PERSPECTIVE_FOV: f32 = 35.0;

/// View height of the orthographic camera, in world units.
const ORTHOGRAPHIC_VIEW_HEIGHT: f32 = 6.0;

/// Camera distance from the origin along +Z.
const CAMERA_DISTANCE: f32 = 10.0;

/// Errors raised while building a [`Stage`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    #[error("no camera projection selected")]
    NoProjection,
}

/// Options for [`Stage::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOptions {
    pub perspective: bool,
    pub orthographic: bool,
    pub ambient_light: bool,
    pub raster: RasterMode,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self {
            perspective: true,
            orthographic: false,
            ambient_light: true,
            raster: RasterMode::default(),
        }
    }
}

/// Timing and viewport information passed to the tick hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Time since the stage started.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
    /// Viewport size in dots.
    pub resolution: (f32, f32),
}

/// Per-frame callback, run after camera controls update and before the
/// frame is rasterized.
pub type Tick = Box<dyn FnMut(&mut Scene, &FrameInfo)>;

/// Owns the scene, the camera and the renderer.
pub struct Stage {
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    renderer: Renderer,
    tick: Option<Tick>,
    elapsed: Duration,
    width: u16,
    height: u16,
    pixel_ratio: PixelRatio,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("camera", &self.camera)
            .field("elapsed", &self.elapsed)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_tick", &self.tick.is_some())
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Build a stage. Perspective wins when both projections are requested;
    /// requesting neither is a configuration error.
    pub fn new(options: StageOptions) -> Result<Self, StageError> {
        let camera = if options.perspective {
            Camera::perspective(PERSPECTIVE_FOV, CAMERA_DISTANCE)
        } else if options.orthographic {
            Camera::orthographic(ORTHOGRAPHIC_VIEW_HEIGHT, CAMERA_DISTANCE)
        } else {
            return Err(StageError::NoProjection);
        };

        let scene = Scene {
            ambient: options.ambient_light.then(AmbientLight::default),
            ..Default::default()
        };

        Ok(Self {
            scene,
            camera,
            controls: OrbitControls::default(),
            renderer: Renderer::new(options.raster),
            tick: None,
            elapsed: Duration::ZERO,
            width: 0,
            height: 0,
            pixel_ratio: options.raster.pixel_ratio(),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// Install the per-frame hook, replacing any previous one.
    pub fn set_tick(&mut self, tick: Tick) {
        self.tick = Some(tick);
    }

    pub fn elapsed_time(&self) -> Duration {
        self.elapsed
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn pixel_ratio(&self) -> PixelRatio {
        self.pixel_ratio
    }

    /// Viewport size in dots.
    pub fn resolution(&self) -> (f32, f32) {
        let (w, h) = self.renderer.dot_size();
        (w as f32, h as f32)
    }

    /// Adapt renderer and camera to a viewport of `width` x `height` cells.
    ///
    /// Safe to call repeatedly and before the first frame.
    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) && self.camera_matches(width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = self.renderer.mode().pixel_ratio();
        self.renderer.set_size(width, height);
        self.camera.set_aspect(Self::aspect_for(width, height));
        tracing::debug!(width, height, aspect = self.camera.aspect(), "stage resized");
    }

    fn aspect_for(width: u16, height: u16) -> f32 {
        width.max(1) as f32 * CELL_ASPECT / height.max(1) as f32
    }

    fn camera_matches(&self, width: u16, height: u16) -> bool {
        (self.camera.aspect() - Self::aspect_for(width, height)).abs() < f32::EPSILON
    }

    /// Render one frame into `area` of `buf`.
    ///
    /// Resizes when `area` changed, advances time by `delta`, updates the
    /// camera controls, runs the tick hook, then rasterizes.
    pub fn render_frame(&mut self, delta: Duration, area: Rect, buf: &mut Buffer) {
        self.resize(area.width, area.height);
        self.elapsed += delta;
        self.controls.update(delta.as_secs_f32());

        let info = FrameInfo {
            elapsed: self.elapsed,
            delta,
            resolution: self.resolution(),
        };
        if let Some(tick) = self.tick.as_mut() {
            tick(&mut self.scene, &info);
        }

        self.renderer
            .render(&self.scene, &self.camera, self.controls.yaw(), area, buf);
    }
}
