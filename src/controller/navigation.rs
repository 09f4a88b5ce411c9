//! Menu and results screen navigation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::{MenuField, MenuState, RemoteService, ResultsState, SearchRequest, SearchResults};
use super::commands;
use super::PlayerController;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Search(SearchRequest),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultsAction {
    None,
    Open(usize),
    Menu,
    Quit,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn handle_menu_key(menu: &mut MenuState, key: KeyEvent) -> MenuAction {
    if key.kind != KeyEventKind::Press {
        return MenuAction::None;
    }
    if is_ctrl_c(&key) {
        return MenuAction::Quit;
    }

    match key.code {
        KeyCode::Esc => return MenuAction::Quit,
        KeyCode::Enter => match menu.to_request() {
            Ok(request) => {
                menu.status = None;
                return MenuAction::Search(request);
            }
            Err(e) => menu.status = Some(format!("Error: {}", e)),
        },
        KeyCode::Tab | KeyCode::Down => menu.focus_next(),
        KeyCode::BackTab | KeyCode::Up => menu.focus_prev(),
        KeyCode::Left if menu.focus == MenuField::SearchType => menu.cycle_kind(false),
        KeyCode::Right if menu.focus == MenuField::SearchType => menu.cycle_kind(true),
        KeyCode::Char(' ') if menu.focus == MenuField::Details => menu.show_details = !menu.show_details,
        KeyCode::Backspace => menu.backspace(),
        KeyCode::Char(c) => menu.push_char(c),
        _ => {}
    }
    MenuAction::None
}

pub fn handle_results_key(results: &mut ResultsState, key: KeyEvent) -> ResultsAction {
    if key.kind != KeyEventKind::Press {
        return ResultsAction::None;
    }
    if is_ctrl_c(&key) {
        return ResultsAction::Quit;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => results.move_up(),
        KeyCode::Down | KeyCode::Char('j') => results.move_down(),
        KeyCode::Char('d') | KeyCode::Char('D') => results.show_details = !results.show_details,
        KeyCode::Enter if !results.results.is_empty() => return ResultsAction::Open(results.selected),
        KeyCode::Char('m') | KeyCode::Char('M') if results.return_to_menu => return ResultsAction::Menu,
        KeyCode::Esc | KeyCode::Char('q') => {
            return if results.return_to_menu {
                ResultsAction::Menu
            } else {
                ResultsAction::Quit
            };
        }
        _ => {}
    }
    ResultsAction::None
}

/// Runs a menu search; the error string is ready for the status line.
pub async fn perform_search(remote: &dyn RemoteService, request: &SearchRequest) -> Result<SearchResults, String> {
    tracing::debug!(query = %request.query, kind = %request.kind, "Performing search");
    match commands::search(remote, request).await {
        Ok(results) if results.is_empty() => {
            tracing::info!(query = %request.query, "Search returned nothing");
            Err(commands::no_results_message(request.kind))
        }
        Ok(results) => {
            tracing::info!(query = %request.query, count = results.len(), "Search completed successfully");
            Ok(results)
        }
        Err(e) => {
            tracing::error!(query = %request.query, error = %e, "Search failed");
            Err(PlayerController::format_error(&e))
        }
    }
}
