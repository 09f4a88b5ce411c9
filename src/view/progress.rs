//! Progress bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::controller::PlayerView;
use crate::model::PlayerState;
use super::utils::format_duration;

/// `mm:ss / mm:ss (p%)`
pub fn progress_label(view: &PlayerView) -> String {
    format!(
        "{} / {} ({:.0}%)",
        format_duration(view.elapsed.as_millis() as u32),
        format_duration(view.total.as_millis() as u32),
        view.progress * 100.0
    )
}

pub fn render_progress_bar(frame: &mut Frame, area: Rect, view: &PlayerView) {
    let status_text = match view.state {
        PlayerState::Playing => " ▶ Playing ",
        PlayerState::Paused => " ⏸  Paused ",
        PlayerState::Idle => " ■ Stopped ",
    };
    let keep_text = if view.keep_playing {
        " Keep playing: On "
    } else {
        " Keep playing: Off "
    };

    let color = match view.state {
        PlayerState::Playing => Color::Green,
        PlayerState::Paused => Color::Yellow,
        PlayerState::Idle => Color::DarkGray,
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text)
                .title_bottom(Line::from(keep_text).right_aligned()),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(view.progress.clamp(0.0, 1.0))
        .label(progress_label(view));

    frame.render_widget(gauge, area);
}
