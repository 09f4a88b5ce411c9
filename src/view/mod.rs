//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by screen:
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists, key help)
//! - `menu`: Interactive search menu
//! - `results`: Search results list and detail pane
//! - `player`: Player screen
//! - `progress`: Progress gauge

mod utils;
mod menu;
mod results;
mod player;
mod progress;

use ratatui::Frame;

use crate::controller::PlayerView;
use crate::model::{MenuState, ResultsState};

pub use player::PlayerAreas;
pub use progress::progress_label;
pub use utils::format_duration;

pub struct AppView;

impl AppView {
    pub fn render_menu(frame: &mut Frame, menu: &MenuState) {
        menu::render(frame, menu);
    }

    pub fn render_results(frame: &mut Frame, results: &ResultsState) {
        results::render(frame, results);
    }

    pub fn render_player(frame: &mut Frame, view: &PlayerView) -> PlayerAreas {
        player::render(frame, view)
    }
}
