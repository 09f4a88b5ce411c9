//! Terminal UI loop: menu, results and player screens

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::controller::{
    commands, handle_menu_key, handle_results_key, perform_search, Handoff, InputOutcome, MenuAction,
    PlayerController, PlayerOptions, ResultsAction, TICK_PERIOD,
};
use crate::model::{MenuState, Queue, RemoteService, ResultsState, Track};
use crate::view::{AppView, PlayerAreas};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything needed to open the player screen
pub struct PlayerLaunch {
    pub queue: Queue,
    pub track: Track,
    pub return_to_menu: bool,
}

pub enum Screen {
    Menu(MenuState),
    Results(ResultsState),
    Player(PlayerLaunch),
}

pub struct App {
    remote: Arc<dyn RemoteService>,
    keep_playing: bool,
    show_details: bool,
}

impl App {
    pub fn new(remote: Arc<dyn RemoteService>, keep_playing: bool, show_details: bool) -> Self {
        Self {
            remote,
            keep_playing,
            show_details,
        }
    }

    /// Takes over the terminal and runs screens until one of them quits.
    pub async fn run(&self, start: Screen) -> Result<()> {
        tracing::info!("Starting TUI...");

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_screens(&mut terminal, start).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        if let Err(ref err) = res {
            tracing::error!(error = ?err, "Application error");
        }
        res
    }

    async fn run_screens(&self, terminal: &mut Tui, start: Screen) -> Result<()> {
        let mut next = Some(start);
        while let Some(screen) = next {
            next = match screen {
                Screen::Menu(menu) => self.run_menu(terminal, menu).await?,
                Screen::Results(results) => self.run_results(terminal, results).await?,
                Screen::Player(launch) => self.run_player(terminal, launch).await?,
            };
        }
        Ok(())
    }

    async fn run_menu(&self, terminal: &mut Tui, mut menu: MenuState) -> Result<Option<Screen>> {
        loop {
            terminal.draw(|f| AppView::render_menu(f, &menu))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };

            match handle_menu_key(&mut menu, key) {
                MenuAction::None => {}
                MenuAction::Quit => return Ok(None),
                MenuAction::Search(request) => {
                    menu.status = Some("Searching...".to_string());
                    terminal.draw(|f| AppView::render_menu(f, &menu))?;

                    match perform_search(self.remote.as_ref(), &request).await {
                        Ok(results) => {
                            return Ok(Some(Screen::Results(ResultsState::new(
                                results,
                                menu.show_details,
                                true,
                            ))));
                        }
                        Err(message) => menu.status = Some(message),
                    }
                }
            }
        }
    }

    async fn run_results(&self, terminal: &mut Tui, mut results: ResultsState) -> Result<Option<Screen>> {
        loop {
            terminal.draw(|f| AppView::render_results(f, &results))?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };

            match handle_results_key(&mut results, key) {
                ResultsAction::None => {}
                ResultsAction::Quit => return Ok(None),
                ResultsAction::Menu => return Ok(Some(Screen::Menu(MenuState::new(self.show_details)))),
                ResultsAction::Open(index) => {
                    results.status = Some("Loading...".to_string());
                    terminal.draw(|f| AppView::render_results(f, &results))?;

                    match commands::open_selection(self.remote.as_ref(), &results.results, index).await {
                        Ok(Some((queue, track))) => {
                            return Ok(Some(Screen::Player(PlayerLaunch {
                                queue,
                                track,
                                return_to_menu: results.return_to_menu,
                            })));
                        }
                        Ok(None) => {
                            results.status = Some(format!("No tracks found in the selected {}.", results.results.kind()));
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Opening selection failed");
                            results.status = Some(PlayerController::format_error(&e));
                        }
                    }
                }
            }
        }
    }

    async fn run_player(&self, terminal: &mut Tui, launch: PlayerLaunch) -> Result<Option<Screen>> {
        let options = PlayerOptions {
            keep_playing: self.keep_playing,
            return_to_menu: launch.return_to_menu,
            tick_period: TICK_PERIOD,
        };
        let (mut controller, mut events) =
            PlayerController::new(self.remote.clone(), launch.queue, launch.track, options);
        controller.play();

        let mut areas = PlayerAreas::default();
        let handoff = loop {
            while let Ok(event) = events.try_recv() {
                controller.handle_event(event);
            }
            controller.clear_expired_status();

            let view = controller.view();
            terminal.draw(|f| {
                areas = AppView::render_player(f, &view);
            })?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if let InputOutcome::Exit(handoff) = controller.handle_key(key) {
                            break handoff;
                        }
                    }
                    Event::Mouse(mouse) => controller.handle_mouse(mouse, Some(areas.gauge)),
                    _ => {}
                }
            }
        };

        controller.finish().await;

        Ok(match handoff {
            Handoff::Menu => Some(Screen::Menu(MenuState::new(self.show_details))),
            Handoff::Quit => None,
        })
    }
}
