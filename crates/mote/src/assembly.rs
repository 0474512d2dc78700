//! Builds the clock face: digit and separator meshes laid out as
//! `HH:MM:SS` inside the scene's timer group.

use std::sync::Arc;
use std::time::Duration;

use mote_config::ClockConfig;
use mote_core::{DIGIT_COUNT, DisplayedTime};
use mote_glyphs::TextureSet;
use mote_stage::{Group, Material, Mesh, ParticleShader, PointGeometry, Scene, Uniforms, Vec3};

/// Number of digit slots: a front and a back mesh per digit position.
pub const SLOT_COUNT: usize = DIGIT_COUNT * 2;

/// Extra stagger per position away from the last digit.
pub const STAGGER_STEP: Duration = Duration::from_millis(100);

/// Width at which the clock reaches full size, in terminal columns.
pub const REFERENCE_COLUMNS: f32 = 150.0;

const MIN_SCALE: f32 = 0.5;
const MAX_SCALE: f32 = 1.0;

const DIGIT_HEIGHT: f32 = 1.6;

/// Particles per digit mesh.
const DIGIT_POINTS: (usize, usize) = (14, 18);
/// Particles per separator mesh.
const SEPARATOR_POINTS: (usize, usize) = (6, 18);

/// Horizontal sizes used by [`layout`], in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutWidths {
    pub digit: f32,
    pub separator: f32,
    pub gap: f32,
}

impl Default for LayoutWidths {
    fn default() -> Self {
        Self {
            digit: 1.25,
            separator: 0.55,
            gap: 0.2,
        }
    }
}

/// Horizontal centers of every element after centering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub digits: [f32; DIGIT_COUNT],
    pub separators: [f32; 2],
}

/// Lay out `[d][d] : [d][d] : [d][d]` left to right, then shift so the
/// bounding box is centered on x = 0.
pub fn layout(widths: LayoutWidths) -> Layout {
    let mut digits = [0.0; DIGIT_COUNT];
    let mut separators = [0.0; 2];
    let mut cursor = 0.0;

    let mut place = |width: f32| {
        let center = cursor + width / 2.0;
        cursor += width + widths.gap;
        center
    };

    for position in 0..DIGIT_COUNT {
        if position == 2 || position == 4 {
            separators[position / 2 - 1] = place(widths.separator);
        }
        digits[position] = place(widths.digit);
    }

    let total = cursor - widths.gap;
    let shift = total / 2.0;
    digits.iter_mut().for_each(|x| *x -= shift);
    separators.iter_mut().for_each(|x| *x -= shift);
    Layout { digits, separators }
}

/// Uniform clock scale for a viewport `columns` wide.
pub fn timer_scale(columns: u16) -> f32 {
    (columns as f32 / REFERENCE_COLUMNS).clamp(MIN_SCALE, MAX_SCALE)
}

/// Stagger for digit `position`: 0 for the last digit, growing leftwards.
pub fn stagger_delay(position: usize) -> Duration {
    STAGGER_STEP * (DIGIT_COUNT - 1 - position.min(DIGIT_COUNT - 1)) as u32
}

/// Front slot of `position`; the back slot is the next one.
pub fn front_slot(position: usize) -> usize {
    position * 2
}

pub fn back_slot(position: usize) -> usize {
    position * 2 + 1
}

/// One of the twelve digit meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitSlot {
    /// Index of the mesh inside the timer group.
    pub mesh: usize,
    /// Whether this is the mesh of its pair currently showing a digit.
    pub is_visible: bool,
    /// Hide animation delay.
    pub delay: Duration,
}

/// Slot records and textures for the clock face. Meshes themselves live in
/// the scene and are referenced by index.
#[derive(Debug)]
pub struct Assembly {
    slots: Vec<DigitSlot>,
    separators: [usize; 2],
    textures: TextureSet,
}

impl Assembly {
    /// Create every mesh in `scene.timer` and return the slot records.
    ///
    /// Front slots start visible and fully assembled on the sentinel digit;
    /// back slots and separators start hidden.
    pub fn build(textures: TextureSet, config: &ClockConfig, scene: &mut Scene) -> Self {
        let widths = LayoutWidths::default();
        let layout = layout(widths);

        let mut uniforms = Uniforms::default();
        uniforms.primary = config.primary;
        uniforms.secondary = config.secondary;
        uniforms.particle_size = config.particle_size;
        uniforms.fall_distance = config.fall_distance;
        let base = Material::new(Arc::new(ParticleShader::default()), uniforms);
        let digit_geometry = Arc::new(PointGeometry::grid(
            DIGIT_POINTS.0,
            DIGIT_POINTS.1,
            widths.digit,
            DIGIT_HEIGHT,
        ));
        let separator_geometry = Arc::new(PointGeometry::grid(
            SEPARATOR_POINTS.0,
            SEPARATOR_POINTS.1,
            widths.separator,
            DIGIT_HEIGHT,
        ));

        scene.background = config.background;
        let timer = &mut scene.timer;

        let sentinel = DisplayedTime::SENTINEL;
        let slots = (0..SLOT_COUNT)
            .map(|slot| {
                let position = slot / 2;
                let is_visible = slot % 2 == 0;
                let mut mesh = Mesh::new(Arc::clone(&digit_geometry), base.clone());
                mesh.position = Vec3::new(layout.digits[position], 0.0, 0.0);
                mesh.visible = is_visible;
                if is_visible {
                    mesh.material.uniforms.texture = textures.digit(sentinel.digit(position));
                    mesh.material.uniforms.set_show_progress(1.0);
                }
                DigitSlot {
                    mesh: timer.add(mesh),
                    is_visible,
                    delay: stagger_delay(position),
                }
            })
            .collect();

        let separators = layout.separators.map(|x| {
            let mut mesh = Mesh::new(Arc::clone(&separator_geometry), base.clone());
            mesh.position = Vec3::new(x, 0.0, 0.0);
            mesh.visible = false;
            mesh.material.uniforms.texture = textures.separator();
            timer.add(mesh)
        });

        tracing::debug!(meshes = timer.len(), "clock face assembled");

        Self {
            slots,
            separators,
            textures,
        }
    }

    pub fn slot(&self, slot: usize) -> &DigitSlot {
        &self.slots[slot]
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut DigitSlot {
        &mut self.slots[slot]
    }

    /// Mesh indices of the two separators.
    pub fn separators(&self) -> [usize; 2] {
        self.separators
    }

    /// Bind the texture for `digit` to the mesh of `slot`.
    pub fn bind_digit(&self, group: &mut Group, slot: usize, digit: u8) {
        if let Some(mesh) = group.mesh_mut(self.slots[slot].mesh) {
            mesh.material.uniforms.texture = self.textures.digit(digit);
        }
    }

    /// Push tunables from `config` into every mesh and the background.
    pub fn apply_config(&self, config: &ClockConfig, scene: &mut Scene) {
        scene.background = config.background;
        scene.for_each_uniforms(|u| {
            u.primary = config.primary;
            u.secondary = config.secondary;
            u.particle_size = config.particle_size;
            u.fall_distance = config.fall_distance;
        });
    }

    /// Scale the whole clock for a viewport `columns` wide.
    pub fn fit(&self, group: &mut Group, columns: u16) {
        let scale = timer_scale(columns);
        if group.scale == scale {
            return;
        }
        group.scale = scale;
        for mesh in group.meshes_mut() {
            mesh.material.uniforms.scale = scale;
        }
        tracing::debug!(columns, scale, "clock rescaled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mote_core::Rgb;

    /// `(min_x, max_x)` covered by the laid out elements.
    fn extent(layout: &Layout, widths: LayoutWidths) -> (f32, f32) {
        let digits = layout
            .digits
            .iter()
            .map(|x| (x - widths.digit / 2.0, x + widths.digit / 2.0));
        let separators = layout
            .separators
            .iter()
            .map(|x| (x - widths.separator / 2.0, x + widths.separator / 2.0));
        digits
            .chain(separators)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), (a, b)| {
                (lo.min(a), hi.max(b))
            })
    }

    fn build() -> (Assembly, Scene) {
        let mut scene = Scene::default();
        let assembly = Assembly::build(TextureSet::builtin(), &ClockConfig::default(), &mut scene);
        (assembly, scene)
    }

    #[test]
    fn test_layout_is_centered_for_any_widths() {
        let cases = [
            LayoutWidths::default(),
            LayoutWidths {
                digit: 3.0,
                separator: 0.1,
                gap: 0.0,
            },
            LayoutWidths {
                digit: 0.4,
                separator: 2.0,
                gap: 1.5,
            },
        ];
        for widths in cases {
            let (lo, hi) = extent(&layout(widths), widths);
            assert!((lo + hi).abs() < 1e-5, "{widths:?} gives {lo}..{hi}");
        }
    }

    #[test]
    fn test_layout_order() {
        let l = layout(LayoutWidths::default());
        let xs = [
            l.digits[0],
            l.digits[1],
            l.separators[0],
            l.digits[2],
            l.digits[3],
            l.separators[1],
            l.digits[4],
            l.digits[5],
        ];
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_scene_bounds_are_centered() {
        let (_, scene) = build();
        let (lo, hi) = scene.timer.bounds_x().unwrap();
        assert!((lo + hi).abs() < 1e-5);
    }

    #[test]
    fn test_scale_is_clamped_and_monotonic() {
        assert_eq!(timer_scale(1), 0.5);
        assert_eq!(timer_scale(0), 0.5);
        assert_eq!(timer_scale(u16::MAX), 1.0);
        let mut previous = 0.0;
        for columns in (0..=400).step_by(5) {
            let scale = timer_scale(columns);
            assert!((0.5..=1.0).contains(&scale));
            assert!(scale >= previous);
            previous = scale;
        }
    }

    #[test]
    fn test_even_slots_start_visible() {
        let (assembly, scene) = build();
        assert_eq!(scene.timer.len(), SLOT_COUNT + 2);
        for i in 0..SLOT_COUNT {
            let slot = assembly.slot(i);
            assert_eq!(slot.is_visible, i % 2 == 0);
            assert_eq!(scene.timer.mesh(slot.mesh).unwrap().visible, i % 2 == 0);
        }
        for mesh in assembly.separators() {
            assert!(!scene.timer.mesh(mesh).unwrap().visible);
        }
    }

    #[test]
    fn test_pairs_overlap_and_delays_stagger() {
        let (assembly, scene) = build();
        for position in 0..DIGIT_COUNT {
            let front = scene.timer.mesh(assembly.slot(front_slot(position)).mesh).unwrap();
            let back = scene.timer.mesh(assembly.slot(back_slot(position)).mesh).unwrap();
            assert_eq!(front.position, back.position);
        }
        assert_eq!(assembly.slot(front_slot(5)).delay, Duration::ZERO);
        assert_eq!(assembly.slot(back_slot(0)).delay, Duration::from_millis(500));
    }

    #[test]
    fn test_materials_are_independent_clones() {
        let (_, mut scene) = build();
        let meshes = scene.timer.meshes_mut();
        assert!(meshes[0].material.shares_shader_with(&meshes[13].material));
        meshes[0].material.uniforms.set_fall_progress(0.7);
        assert_eq!(meshes[1].material.uniforms.fall_progress(), 0.0);
    }

    #[test]
    fn test_build_seeds_uniforms_from_config() {
        let config = ClockConfig {
            secondary: Rgb::new(7, 8, 9),
            particle_size: 0.05,
            ..Default::default()
        };
        let mut scene = Scene::default();
        let assembly = Assembly::build(TextureSet::builtin(), &config, &mut scene);
        for i in 0..SLOT_COUNT {
            let uniforms = &scene.timer.mesh(assembly.slot(i).mesh).unwrap().material.uniforms;
            assert_eq!(uniforms.secondary, Rgb::new(7, 8, 9));
            assert_eq!(uniforms.particle_size, 0.05);
            let assembled = if i % 2 == 0 { 1.0 } else { 0.0 };
            assert_eq!(uniforms.show_progress(), assembled);
            assert_eq!(uniforms.fall_progress(), 0.0);
        }
    }

    #[test]
    fn test_apply_config_reaches_every_mesh() {
        let (assembly, mut scene) = build();
        let config = ClockConfig {
            primary: Rgb::new(1, 2, 3),
            fall_distance: 4.0,
            background: Rgb::new(9, 9, 9),
            ..Default::default()
        };
        assembly.apply_config(&config, &mut scene);
        assert_eq!(scene.background, Rgb::new(9, 9, 9));
        assert!(scene.timer.meshes().iter().all(|m| {
            m.material.uniforms.primary == Rgb::new(1, 2, 3)
                && m.material.uniforms.fall_distance == 4.0
        }));
    }

    #[test]
    fn test_fit_scales_group_and_uniforms() {
        let (assembly, mut scene) = build();
        assembly.fit(&mut scene.timer, 75);
        assert_eq!(scene.timer.scale, 0.5);
        assert!(scene.timer.meshes().iter().all(|m| m.material.uniforms.scale == 0.5));
    }
}
