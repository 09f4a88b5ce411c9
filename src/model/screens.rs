//! UI state for the menu and results screens

use crate::error::ConfigError;
use super::types::{SearchKind, SearchRequest, SearchResults};

/// Input field with focus on the menu screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuField {
    SearchType,
    Query,
    Artist,
    Limit,
    Details,
}

#[derive(Clone, Debug)]
pub struct MenuState {
    pub kind: SearchKind,
    pub query: String,
    pub artist: String,
    pub limit: String,
    pub show_details: bool,
    pub focus: MenuField,
    pub status: Option<String>,
}

impl MenuState {
    pub fn new(show_details: bool) -> Self {
        Self {
            kind: SearchKind::Track,
            query: String::new(),
            artist: String::new(),
            limit: SearchRequest::DEFAULT_LIMIT.to_string(),
            show_details,
            focus: MenuField::SearchType,
            status: None,
        }
    }

    /// Fields in tab order; the artist filter only exists for track searches.
    pub fn fields(&self) -> Vec<MenuField> {
        let mut fields = vec![MenuField::SearchType, MenuField::Query];
        if self.kind == SearchKind::Track {
            fields.push(MenuField::Artist);
        }
        fields.extend([MenuField::Limit, MenuField::Details]);
        fields
    }

    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(pos + fields.len() - 1) % fields.len()];
    }

    pub fn cycle_kind(&mut self, forward: bool) {
        self.kind = if forward { self.kind.next() } else { self.kind.prev() };
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            MenuField::Query => self.query.push(c),
            MenuField::Artist => self.artist.push(c),
            MenuField::Limit if c.is_ascii_digit() && self.limit.len() < 2 => self.limit.push(c),
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            MenuField::Query => {
                self.query.pop();
            }
            MenuField::Artist => {
                self.artist.pop();
            }
            MenuField::Limit => {
                self.limit.pop();
            }
            _ => {}
        }
    }

    pub fn to_request(&self) -> Result<SearchRequest, ConfigError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ConfigError::MissingQuery);
        }
        let limit = self.limit.parse::<u32>().unwrap_or(0);
        if limit == 0 || limit > SearchRequest::MAX_LIMIT {
            return Err(ConfigError::InvalidLimit(limit));
        }
        let artist = self.artist.trim();

        Ok(SearchRequest {
            kind: self.kind,
            query: query.to_string(),
            artist: (self.kind == SearchKind::Track && !artist.is_empty()).then(|| artist.to_string()),
            limit,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ResultsState {
    pub results: SearchResults,
    pub selected: usize,
    pub show_details: bool,
    /// Esc goes back to the menu instead of quitting
    pub return_to_menu: bool,
    pub status: Option<String>,
}

impl ResultsState {
    pub fn new(results: SearchResults, show_details: bool, return_to_menu: bool) -> Self {
        Self {
            results,
            selected: 0,
            show_details,
            return_to_menu,
            status: None,
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }
}
