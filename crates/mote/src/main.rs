mod animator;
mod assembly;
mod driver;
mod logging;
mod panel;

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mote_config::{ClockConfig, Projection, RenderMode};
use mote_glyphs::TextureSet;
use mote_stage::{FrameInfo, RasterMode, Scene, Stage, StageError, StageOptions};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};

use crate::animator::Animator;
use crate::assembly::Assembly;
use crate::driver::{ClockDriver, LocalClock};
use crate::panel::DebugPanel;

/// Radians added to the orbit target per arrow key press.
const ORBIT_STEP: f32 = 0.1;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _log_guard = logging::init();

    if !std::io::stdout().is_terminal() {
        tracing::warn!("stdout is not a terminal, nothing to draw on");
        return Ok(());
    }

    let config = ClockConfig::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "falling back to default configuration");
        ClockConfig::default()
    });

    let app = match App::new(config) {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(%err, "stage construction failed");
            eprintln!("mote: {err}");
            return Ok(());
        }
    };

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    config: ClockConfig,
    stage: Stage,
    assembly: Assembly,
    driver: ClockDriver,
    animator: Animator,
    panel: DebugPanel,
    clock: LocalClock,
    last_frame: Instant,
}

impl App {
    /// Build the stage and the clock face from `config`.
    pub fn new(config: ClockConfig) -> Result<Self, StageError> {
        let mut stage = Stage::new(stage_options(&config))?;

        let textures = TextureSet::load(config.glyph_dir.as_deref());
        let assembly = Assembly::build(textures, &config, stage.scene_mut());

        stage.set_tick(Box::new(|scene: &mut Scene, info: &FrameInfo| {
            let time = info.elapsed.as_secs_f32();
            scene.for_each_uniforms(|u| {
                u.time = time;
                u.resolution = info.resolution;
            });
        }));

        tracing::info!(
            projection = ?config.projection,
            render_mode = ?config.render_mode,
            frame_rate = config.frame_rate,
            "clock started"
        );

        Ok(Self {
            running: false,
            driver: ClockDriver::new(config.time_format),
            config,
            stage,
            assembly,
            animator: Animator::new(),
            panel: DebugPanel::new(),
            clock: LocalClock,
            last_frame: Instant::now(),
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let frame_interval = Duration::from_secs(1) / self.config.frame_rate.max(1);
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(frame_interval)?;
        }
        tracing::info!("clock stopped");
        Ok(())
    }

    /// Advance the clock by the wall time since the previous frame and draw.
    fn render(&mut self, frame: &mut Frame) {
        let dt = self.frame_delta(Instant::now());

        let [stage_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        self.step(dt, stage_area.width);
        self.stage.render_frame(dt, stage_area, frame.buffer_mut());
        if self.panel.is_open() {
            let status = (self.driver.displayed(), self.driver.transitions_in_flight());
            self.panel.render(frame, stage_area, &self.config, status);
        }

        let color = ratatui::style::Color::from(self.config.primary);
        let help = Line::from(vec![
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "t".bold().fg(color),
            format!(" {}  ", self.config.time_format.toggle().label()).dark_gray(),
            "←→".bold().fg(color),
            " orbit  ".dark_gray(),
            "r".bold().fg(color),
            " reset  ".dark_gray(),
            "d".bold().fg(color),
            " debug".dark_gray(),
        ])
        .centered();
        frame.render_widget(help, help_area);
    }

    /// Time since the previous frame. The first frame counts from
    /// construction, so startup delays include terminal setup.
    fn frame_delta(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        dt
    }

    /// Drive digit transitions and tweens for one frame.
    fn step(&mut self, dt: Duration, columns: u16) {
        let timer = &mut self.stage.scene_mut().timer;
        self.assembly.fit(timer, columns);
        self.driver
            .update(dt, &self.clock, &mut self.assembly, timer, &mut self.animator);
        self.animator.advance(timer, dt);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame interval so the animation keeps running.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(width, height) => self.on_resize(width, height),
                _ => {}
            }
        }
        Ok(())
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        // One row is reserved for the help line.
        self.stage.resize(width, height.saturating_sub(1));
        self.assembly.fit(&mut self.stage.scene_mut().timer, width);
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('d')) => self.panel.toggle(),
            (_, KeyCode::Char('t')) => self.toggle_time_format(),
            (_, KeyCode::Left) => self.stage.controls_mut().nudge(-ORBIT_STEP),
            (_, KeyCode::Right) => self.stage.controls_mut().nudge(ORBIT_STEP),
            (_, KeyCode::Char('r')) => self.stage.controls_mut().reset(),
            _ => {
                if self.panel.handle_key(key, &mut self.config) {
                    self.assembly
                        .apply_config(&self.config, self.stage.scene_mut());
                }
            }
        }
    }

    fn toggle_time_format(&mut self) {
        self.config.time_format = self.config.time_format.toggle();
        self.driver.set_time_format(self.config.time_format);
        tracing::debug!(format = self.config.time_format.label(), "time format toggled");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

fn stage_options(config: &ClockConfig) -> StageOptions {
    StageOptions {
        perspective: config.projection == Projection::Perspective,
        orthographic: config.projection == Projection::Orthographic,
        ambient_light: config.ambient_light,
        raster: match config.render_mode {
            RenderMode::Braille => RasterMode::Braille,
            RenderMode::Cells => RasterMode::Cells,
        },
    }
}
