//! Debug panel for live-editing the particle parameters.

use crossterm::event::{KeyCode, KeyEvent};
use mote_config::{ClockConfig, Param};
use mote_core::DisplayedTime;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const PANEL_WIDTH: u16 = 34;

/// Overlay state. Lives as long as the app.
#[derive(Debug, Default)]
pub struct DebugPanel {
    open: bool,
    selected: Option<Param>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn selected(&self) -> Param {
        self.selected.unwrap_or(Param::ALL[0])
    }

    /// Handle a key while the panel is open. Returns `true` when `config`
    /// changed and needs to be re-applied.
    pub fn handle_key(&mut self, key: KeyEvent, config: &mut ClockConfig) -> bool {
        if !self.open {
            return false;
        }
        let param = self.selected();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = Some(param.prev());
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = Some(param.next());
                false
            }
            KeyCode::Char('+' | '=') => {
                config.adjust(param, 1);
                tracing::debug!(param = param.label(), value = %config.display_value(param), "parameter edited");
                true
            }
            KeyCode::Char('-' | '_') => {
                config.adjust(param, -1);
                tracing::debug!(param = param.label(), value = %config.display_value(param), "parameter edited");
                true
            }
            _ => false,
        }
    }

    /// Draw the panel in the top-right corner of `area`, with the shown
    /// time and the number of digits mid-swap on the last line.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        config: &ClockConfig,
        (displayed, swapping): (DisplayedTime, usize),
    ) {
        let height = Param::ALL.len() as u16 + 4;
        let width = PANEL_WIDTH.min(area.width);
        let panel = Rect::new(
            area.x + area.width.saturating_sub(width),
            area.y,
            width,
            height.min(area.height),
        );

        let lines: Vec<Line> = Param::ALL
            .iter()
            .map(|&param| {
                let marker = if param == self.selected() { "> " } else { "  " };
                let mut spans = vec![
                    Span::raw(marker),
                    Span::raw(format!("{:<14}", param.label())),
                    Span::raw(config.display_value(param)).bold(),
                ];
                if let Some(bounds) = param.bounds() {
                    spans.push(
                        format!(" [{}..{}]", bounds.min, bounds.max).dark_gray(),
                    );
                } else if let Some(color) = swatch(param, config) {
                    spans.push(Span::styled(" ██", Style::new().fg(color)));
                }
                let line = Line::from(spans);
                if param == self.selected() {
                    line.reversed()
                } else {
                    line
                }
            })
            .chain([
                Line::from(format!("  {displayed}  swapping {swapping}")).dark_gray(),
                Line::from("↑↓ select  +/- adjust").dark_gray(),
            ])
            .collect();

        frame.render_widget(Clear, panel);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" debug ")),
            panel,
        );
    }
}

fn swatch(param: Param, config: &ClockConfig) -> Option<Color> {
    match param {
        Param::Background => Some(config.background.into()),
        Param::Primary => Some(config.primary.into()),
        Param::Secondary => Some(config.secondary.into()),
        Param::ParticleSize | Param::FallDistance => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_closed_panel_ignores_keys() {
        let mut panel = DebugPanel::new();
        let mut config = ClockConfig::default();
        assert!(!panel.handle_key(key(KeyCode::Char('+')), &mut config));
        assert_eq!(config, ClockConfig::default());
    }

    #[test]
    fn test_select_and_adjust() {
        let mut panel = DebugPanel::new();
        panel.toggle();
        let mut config = ClockConfig::default();

        for _ in 0..3 {
            panel.handle_key(key(KeyCode::Down), &mut config);
        }
        assert_eq!(panel.selected(), Param::ParticleSize);

        assert!(panel.handle_key(key(KeyCode::Char('+')), &mut config));
        assert!((config.particle_size - 0.021).abs() < 1e-6);
        assert!(panel.handle_key(key(KeyCode::Char('-')), &mut config));
        assert!((config.particle_size - 0.02).abs() < 1e-6);

        panel.handle_key(key(KeyCode::Up), &mut config);
        assert_eq!(panel.selected(), Param::Secondary);
    }

    #[test]
    fn test_navigation_does_not_report_change() {
        let mut panel = DebugPanel::new();
        panel.toggle();
        let mut config = ClockConfig::default();
        assert!(!panel.handle_key(key(KeyCode::Down), &mut config));
        assert!(!panel.handle_key(key(KeyCode::Char('x')), &mut config));
    }
}
