//! Utility functions for rendering UI components

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState},
    Frame,
};

/// Renders `items` as a list scrolled so that `selected` stays visible.
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, items: Vec<ListItem>, selected: usize, block: Block) {
    // Rows style themselves; the list only tracks the offset
    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Key help as `key action | key action ...`, keys highlighted.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }
    Line::from(spans)
}

/// `m:ss`, minutes unbounded.
pub fn format_duration(ms: u32) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Width of the row-number column: digits of `item_count` plus a space.
pub fn calculate_num_width(item_count: usize) -> usize {
    item_count.max(1).ilog10() as usize + 2
}

/// Pads `s` to exactly `max_width` chars, cutting it with `...` when longer.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let fitted = if s.chars().count() > max_width {
        let kept: String = s.chars().take(max_width.saturating_sub(3)).collect();
        kept + "..."
    } else {
        s.to_string()
    };
    format!("{:<max_width$}", fitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(185_999), "3:05");
        assert_eq!(format_duration(3_600_000), "60:00");
    }

    #[test]
    fn number_column_fits_the_largest_index() {
        assert_eq!(calculate_num_width(0), 2);
        assert_eq!(calculate_num_width(9), 2);
        assert_eq!(calculate_num_width(10), 3);
        assert_eq!(calculate_num_width(50), 3);
    }

    #[test]
    fn long_strings_are_cut_with_ellipsis() {
        assert_eq!(truncate_string("Blue in Green", 8), "Blue ...");
        assert_eq!(truncate_string("So", 4), "So  ");
    }
}
