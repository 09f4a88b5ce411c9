//! Player screen: track details, queue position, progress and key help

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::controller::PlayerView;
use crate::model::QueueMode;
use super::progress::render_progress_bar;
use super::utils::key_hints;

/// Screen areas the input layer needs to map mouse clicks
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerAreas {
    pub gauge: Rect,
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<14}", text), Style::default().fg(Color::DarkGray))
}

pub fn render(frame: &mut Frame, view: &PlayerView) -> PlayerAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Track info
            Constraint::Length(3), // Progress gauge
            Constraint::Length(3), // Status line
            Constraint::Length(3), // Key help
        ])
        .split(frame.area());

    render_track_info(frame, chunks[0], view);
    render_progress_bar(frame, chunks[1], view);
    render_status(frame, chunks[2], view);
    render_help(frame, chunks[3], view);

    PlayerAreas { gauge: chunks[1] }
}

fn render_track_info(frame: &mut Frame, area: Rect, view: &PlayerView) {
    let track = &view.track;
    let mut lines = vec![
        Line::from(vec![
            label("Track:"),
            Span::styled(track.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![label("Artist:"), Span::raw(track.artist_line())]),
        Line::from(vec![label("Album:"), Span::raw(track.album.clone())]),
    ];
    if !track.release_date.is_empty() {
        lines.push(Line::from(vec![label("Released:"), Span::raw(track.release_date.clone())]));
    }
    lines.push(Line::from(vec![
        label("Link:"),
        Span::styled(track.link(), Style::default().fg(Color::Cyan)),
    ]));

    if view.mode != QueueMode::Single {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            label("Mode:"),
            Span::raw(view.mode.to_string()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("Playlist Progress: {}/{} tracks", view.position, view.queue_len),
            Style::default().fg(Color::Green),
        )));
    }

    let info = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now Playing ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(info, area);
}

fn render_status(frame: &mut Frame, area: Rect, view: &PlayerView) {
    let (text, style) = match &view.status {
        Some(status) if status.is_error => (status.text.clone(), Style::default().fg(Color::Red)),
        Some(status) => (status.text.clone(), Style::default().fg(Color::Yellow)),
        None => (String::new(), Style::default()),
    };

    let widget = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(widget, area);
}

fn render_help(frame: &mut Frame, area: Rect, view: &PlayerView) {
    let exit = if view.return_to_menu { "menu" } else { "quit" };
    let mut hints = vec![("Space", "play/pause"), ("←/→", "seek 10s")];
    if view.mode != QueueMode::Single || view.keep_playing {
        hints.push(("n/p", "next/prev"));
    }
    hints.push(("k", "keep playing"));
    hints.push(("Esc", exit));

    let help = Paragraph::new(key_hints(&hints)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
