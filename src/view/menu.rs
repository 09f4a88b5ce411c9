//! Interactive search menu

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{MenuField, MenuState, SearchKind};
use super::utils::key_hints;

pub fn render(frame: &mut Frame, menu: &MenuState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(9),    // Form
            Constraint::Length(3), // Status
            Constraint::Length(3), // Key help
        ])
        .split(frame.area());

    render_form(frame, chunks[0], menu);

    let status = Paragraph::new(menu.status.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[1]);

    let help = Paragraph::new(key_hints(&[
        ("Tab/↑/↓", "field"),
        ("←/→", "search type"),
        ("Space", "toggle details"),
        ("Enter", "search"),
        ("Esc", "quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}

fn render_form(frame: &mut Frame, area: Rect, menu: &MenuState) {
    let lines: Vec<Line> = menu
        .fields()
        .into_iter()
        .map(|field| field_line(menu, field))
        .collect();

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Spotify Search ")
            .padding(Padding::uniform(1)),
    );
    frame.render_widget(form, area);
}

fn field_line(menu: &MenuState, field: MenuField) -> Line<'static> {
    let focused = menu.focus == field;
    let (name, value) = match field {
        MenuField::SearchType => (
            "Search Type",
            SearchKind::ALL
                .iter()
                .map(|k| if *k == menu.kind { format!("[{}]", k) } else { k.to_string() })
                .collect::<Vec<_>>()
                .join("  "),
        ),
        MenuField::Query => ("Query", with_cursor(&menu.query, focused)),
        MenuField::Artist => ("Artist", with_cursor(&menu.artist, focused)),
        MenuField::Limit => ("Limit", with_cursor(&menu.limit, focused)),
        MenuField::Details => ("Show Details", if menu.show_details { "[x]" } else { "[ ]" }.to_string()),
    };

    let marker = if focused { "> " } else { "  " };
    let name_style = if focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Line::from(vec![
        Span::styled(format!("{}{:<14}", marker, name), name_style),
        Span::raw(value),
    ])
}

fn with_cursor(value: &str, focused: bool) -> String {
    if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    }
}
