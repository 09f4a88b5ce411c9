//! Search results list with an optional detail pane

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{ResultsState, SearchResults};
use super::utils::{calculate_num_width, format_duration, key_hints, render_scrollable_list, truncate_string};

pub fn render(frame: &mut Frame, state: &ResultsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Results
            Constraint::Length(3), // Key help
        ])
        .split(frame.area());

    let body = if state.show_details {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[0])
    } else {
        Layout::default()
            .constraints([Constraint::Percentage(100)])
            .split(chunks[0])
    };

    render_list(frame, body[0], state);
    if state.show_details {
        render_details(frame, body[1], state);
    }

    let exit = if state.return_to_menu { "menu" } else { "quit" };
    let help = match &state.status {
        Some(status) => Line::from(Span::styled(status.clone(), Style::default().fg(Color::Red))),
        None => key_hints(&[("↑/↓", "select"), ("Enter", "play"), ("d", "details"), ("Esc", exit)]),
    };
    frame.render_widget(Paragraph::new(help).block(Block::default().borders(Borders::ALL)), chunks[1]);
}

fn render_list(frame: &mut Frame, area: Rect, state: &ResultsState) {
    let content_width = area.width.saturating_sub(2) as usize;
    let num_width = calculate_num_width(state.results.len());
    let text_width = content_width.saturating_sub(num_width + 10);

    let rows: Vec<(String, String)> = match &state.results {
        SearchResults::Tracks(tracks) => tracks
            .iter()
            .map(|t| (t.name.clone(), format!("{}  {}", t.artist_line(), format_duration(t.duration_ms))))
            .collect(),
        SearchResults::Albums(albums) => albums
            .iter()
            .map(|a| (a.name.clone(), a.artists.join(", ")))
            .collect(),
        SearchResults::Playlists(playlists) => playlists
            .iter()
            .map(|p| (p.name.clone(), format!("{} tracks", p.total_tracks)))
            .collect(),
    };

    let items: Vec<ListItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, (title, extra))| {
            let selected = i == state.selected;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let title_width = (text_width * 55) / 100;
            let line = format!(
                " {:>num_width$}  {}  {}",
                i + 1,
                truncate_string(&title, title_width),
                truncate_string(&extra, text_width.saturating_sub(title_width)),
                num_width = num_width
            );
            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(
        " {} ({}) ",
        capitalize(state.results.kind().plural()),
        state.results.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(title);
    render_scrollable_list(frame, area, items, state.selected, block);
}

fn render_details(frame: &mut Frame, area: Rect, state: &ResultsState) {
    let lines = detail_lines(&state.results, state.selected);
    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(details, area);
}

fn detail_lines(results: &SearchResults, index: usize) -> Vec<Line<'static>> {
    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", name), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ])
    };

    match results {
        SearchResults::Tracks(tracks) => tracks.get(index).map(|t| {
            vec![
                field("Name", t.name.clone()),
                field("Artists", t.artist_line()),
                field("Album", t.album.clone()),
                field("Released", t.release_date.clone()),
                field("Duration", format_duration(t.duration_ms)),
                field("Link", t.link()),
            ]
        }),
        SearchResults::Albums(albums) => albums.get(index).map(|a| {
            vec![
                field("Name", a.name.clone()),
                field("Artists", a.artists.join(", ")),
                field("Released", a.release_date.clone()),
                field("Link", format!("https://open.spotify.com/album/{}", a.id)),
            ]
        }),
        SearchResults::Playlists(playlists) => playlists.get(index).map(|p| {
            vec![
                field("Name", p.name.clone()),
                field("Owner", p.owner.clone()),
                field("Tracks", p.total_tracks.to_string()),
                field("Link", format!("https://open.spotify.com/playlist/{}", p.id)),
            ]
        }),
    }
    .unwrap_or_default()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
