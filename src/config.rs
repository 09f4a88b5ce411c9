//! Command-line flags, run mode selection and credential lookup

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;
use crate::model::{SearchKind, SearchRequest};

pub const CLIENT_ID_VAR: &str = "SPOTIFY_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_SECRET";

const EXAMPLES: &str = "\
Examples:
  spotty -t track -q \"Bohemian Rhapsody\"
  spotty -t track -q \"Bohemian Rhapsody\" -a \"Queen\"
  spotty -t album -q \"Dark Side of the Moon\" -l 3
  spotty -t playlist -q \"workout\" -d
  spotty -i
  spotty -q \"Bohemian Rhapsody\" -r
  spotty -q \"Bohemian Rhapsody\" -k
  spotty -q \"Bohemian Rhapsody\" -p
  spotty -s
  spotty -u spotify";

#[derive(Parser, Debug, Clone)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = "A CLI tool to search and play Spotify tracks, albums, and playlists.",
    after_help = EXAMPLES,
)]
pub struct Cli {
    /// Search type (track, album, playlist)
    #[arg(short = 't', long = "type", default_value = "track")]
    pub search_type: String,

    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Filter track searches by artist name
    #[arg(short, long)]
    pub artist: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = SearchRequest::DEFAULT_LIMIT)]
    pub limit: u32,

    /// Show detailed information about results
    #[arg(short, long)]
    pub details: bool,

    /// Start the interactive search menu
    #[arg(short, long)]
    pub interactive: bool,

    /// Go back to the menu when the player closes
    #[arg(short, long)]
    pub return_to_menu: bool,

    /// Keep playing after the player closes, and loop the queue
    #[arg(short, long)]
    pub keep_playing: bool,

    /// Play the first result and exit
    #[arg(short = 'p', long)]
    pub auto_play: bool,

    /// Stop whatever is currently playing
    #[arg(short, long)]
    pub stop: bool,

    /// Show a Spotify user's public profile
    #[arg(short, long)]
    pub user: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunMode {
    Profile { user_id: String },
    Stop,
    Interactive,
    Search { request: SearchRequest, autoplay: bool },
}

/// Immutable run configuration built once from the flags
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub mode: RunMode,
    pub keep_playing: bool,
    pub return_to_menu: bool,
    pub show_details: bool,
}

impl AppConfig {
    /// Profile lookup wins over stop, stop over the menu, the menu over a search.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let mode = if let Some(user_id) = cli.user.filter(|u| !u.is_empty()) {
            RunMode::Profile { user_id }
        } else if cli.stop {
            RunMode::Stop
        } else if cli.interactive {
            RunMode::Interactive
        } else {
            let kind = SearchKind::from_str(&cli.search_type, true)
                .map_err(|_| ConfigError::InvalidSearchType(cli.search_type.clone()))?;
            let query = cli.query.unwrap_or_default();
            if query.trim().is_empty() {
                return Err(ConfigError::MissingQuery);
            }
            if cli.limit == 0 || cli.limit > SearchRequest::MAX_LIMIT {
                return Err(ConfigError::InvalidLimit(cli.limit));
            }
            RunMode::Search {
                request: SearchRequest {
                    kind,
                    query,
                    artist: cli.artist.filter(|a| !a.trim().is_empty()),
                    limit: cli.limit,
                },
                autoplay: cli.auto_play,
            }
        };

        Ok(Self {
            mode,
            keep_playing: cli.keep_playing,
            return_to_menu: cli.return_to_menu,
            show_details: cli.details,
        })
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, Vec<ConfigError>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads both credentials, reporting every missing one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Vec<ConfigError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(name).filter(|v| !v.is_empty()).ok_or(ConfigError::MissingCredential(name));
        match (read(CLIENT_ID_VAR), read(CLIENT_SECRET_VAR)) {
            (Ok(client_id), Ok(client_secret)) => Ok(Self {
                client_id,
                client_secret,
            }),
            (id, secret) => Err([id.err(), secret.err()].into_iter().flatten().collect()),
        }
    }
}

/// Setup instructions printed when credentials are missing
pub fn credentials_help(missing: &[ConfigError]) -> String {
    let rule = "=".repeat(65);
    let mut out = format!("{rule}\nERROR: Spotify API credentials not properly configured\n{rule}\n");
    for error in missing {
        out.push_str(&format!("{}\n", capitalize_first(&error.to_string())));
    }
    out.push_str(&format!(
        "\nTo set up your credentials:\n\
         1. Go to https://developer.spotify.com/dashboard/\n\
         2. Log in and create a new app\n\
         3. Set the redirect URI to http://localhost:8888/callback in your app settings\n\
         4. Set these environment variables with your credentials:\n   \
         export {CLIENT_ID_VAR}=your_client_id\n   \
         export {CLIENT_SECRET_VAR}=your_client_secret\n\
         {rule}"
    ));
    out
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<AppConfig, ConfigError> {
        let cli = Cli::try_parse_from(std::iter::once("spotty").chain(args.iter().copied()))
            .expect("flags parse");
        AppConfig::from_cli(cli)
    }

    #[test]
    fn search_needs_a_query() {
        assert_eq!(parse(&["-t", "album"]), Err(ConfigError::MissingQuery));
    }

    #[test]
    fn invalid_type_only_matters_for_searches() {
        assert_eq!(
            parse(&["-t", "podcast", "-q", "x"]),
            Err(ConfigError::InvalidSearchType("podcast".into()))
        );
        assert_eq!(parse(&["-t", "podcast", "-s"]).map(|c| c.mode), Ok(RunMode::Stop));
    }

    #[test]
    fn precedence_profile_stop_interactive_search() {
        assert_eq!(
            parse(&["-u", "spotify", "-s", "-i", "-q", "x"]).map(|c| c.mode),
            Ok(RunMode::Profile { user_id: "spotify".into() })
        );
        assert_eq!(parse(&["-s", "-i"]).map(|c| c.mode), Ok(RunMode::Stop));
        assert_eq!(parse(&["-i", "-q", "x"]).map(|c| c.mode), Ok(RunMode::Interactive));
    }

    #[test]
    fn search_flags_build_a_request() {
        let config = parse(&["-q", "Bohemian Rhapsody", "-a", "Queen", "-l", "3", "-p", "-k", "-d"]).expect("valid");
        assert!(config.keep_playing);
        assert!(config.show_details);
        assert_eq!(
            config.mode,
            RunMode::Search {
                request: SearchRequest {
                    kind: SearchKind::Track,
                    query: "Bohemian Rhapsody".into(),
                    artist: Some("Queen".into()),
                    limit: 3,
                },
                autoplay: true,
            }
        );
    }

    #[test]
    fn limit_is_bounded() {
        assert_eq!(parse(&["-q", "x", "-l", "51"]), Err(ConfigError::InvalidLimit(51)));
        assert_eq!(parse(&["-q", "x", "-l", "0"]), Err(ConfigError::InvalidLimit(0)));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["spotty", "--bogus"]).is_err());
    }

    #[test]
    fn missing_credentials_are_all_reported() {
        let err = Credentials::from_lookup(|_| None).expect_err("nothing set");
        assert_eq!(
            err,
            vec![
                ConfigError::MissingCredential(CLIENT_ID_VAR),
                ConfigError::MissingCredential(CLIENT_SECRET_VAR),
            ]
        );

        let help = credentials_help(&err);
        assert!(help.contains("Missing SPOTIFY_ID environment variable"));
        assert!(help.contains("export SPOTIFY_SECRET=your_client_secret"));
    }

    #[test]
    fn credentials_from_lookup() {
        let creds = Credentials::from_lookup(|name| Some(format!("{name}-value"))).expect("both set");
        assert_eq!(creds.client_id, "SPOTIFY_ID-value");
        assert!(!format!("{:?}", creds).contains("SPOTIFY_SECRET-value"));
    }
}
