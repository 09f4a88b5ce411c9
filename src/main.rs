use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use spotty::app::{App, Screen};
use spotty::auth;
use spotty::config::{credentials_help, AppConfig, Cli, Credentials, RunMode};
use spotty::controller::autoplay::AUTOPLAY_TIMEOUT;
use spotty::controller::commands;
use spotty::logging;
use spotty::model::{MenuState, RemoteService, ResultsState, SpotifyClient};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    let config = match AppConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            let _ = Cli::command().print_help();
            return ExitCode::FAILURE;
        }
    };

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(missing) => {
            println!("{}", credentials_help(&missing));
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match logging::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!(mode = ?config.mode, "=== spotty starting ===");

    let res = run(config, credentials).await;
    tracing::info!("spotty shutting down");

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "Fatal error");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig, credentials: Credentials) -> Result<()> {
    let spotify = auth::authenticate(&credentials).await?;
    let remote: Arc<dyn RemoteService> = Arc::new(SpotifyClient::new(spotify));
    let app = App::new(remote.clone(), config.keep_playing, config.show_details);

    match &config.mode {
        RunMode::Profile { user_id } => commands::run_profile(remote.as_ref(), user_id).await,
        RunMode::Stop => commands::run_stop(remote.as_ref()).await,
        RunMode::Interactive => app.run(Screen::Menu(MenuState::new(config.show_details))).await?,
        RunMode::Search { request, autoplay } => {
            let results = match commands::search(remote.as_ref(), request).await {
                Ok(results) => results,
                Err(e) => {
                    eprintln!("{}", e);
                    return Ok(());
                }
            };
            if results.is_empty() {
                println!("{}", commands::no_results_message(request.kind));
                return Ok(());
            }

            if *autoplay {
                commands::run_autoplay_search(remote, &results, AUTOPLAY_TIMEOUT).await;
            } else {
                let state = ResultsState::new(results, config.show_details, config.return_to_menu);
                app.run(Screen::Results(state)).await?;
            }
        }
    }
    Ok(())
}
