//! Key and mouse handling for the player screen

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::{Handoff, PlayerController, SEEK_STEP_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Continue,
    Exit(Handoff),
}

impl PlayerController {
    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        if key.kind != KeyEventKind::Press {
            return InputOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => return InputOutcome::Exit(self.exit()),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return InputOutcome::Exit(self.exit());
            }
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Char('k') | KeyCode::Char('K') => self.toggle_keep_playing(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.next(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.previous(),
            KeyCode::Left => self.seek(-SEEK_STEP_MS),
            KeyCode::Right => self.seek(SEEK_STEP_MS),
            _ => {}
        }
        InputOutcome::Continue
    }

    /// `gauge` is the screen area of the progress bar, borders included.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, gauge: Option<Rect>) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.seek(SEEK_STEP_MS),
            MouseEventKind::ScrollDown => self.seek(-SEEK_STEP_MS),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(ratio) = gauge.and_then(|area| click_ratio(area, mouse.column, mouse.row)) {
                    self.seek_to_ratio(ratio);
                }
            }
            _ => {}
        }
    }
}

/// Horizontal position of a click inside the gauge's inner area, as 0.0..=1.0.
fn click_ratio(area: Rect, column: u16, row: u16) -> Option<f64> {
    let inner_x = area.x.saturating_add(1);
    let inner_width = area.width.saturating_sub(2);
    if inner_width == 0 || row < area.y || row >= area.y.saturating_add(area.height) {
        return None;
    }
    if column < inner_x || column >= inner_x + inner_width {
        return None;
    }

    Some(f64::from(column - inner_x) / f64::from(inner_width.saturating_sub(1).max(1)))
}
