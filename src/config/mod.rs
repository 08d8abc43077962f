//! Typed configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for log collectors.
    Json,
    /// Human-readable output for local runs.
    Plain,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "json" => Ok(LogFormat::Json),
            "plain" => Ok(LogFormat::Plain),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Logging parameters.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Used when RUST_LOG is not set.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            default_filter: "info,actix_web=info,actix_server=warn".to_string(),
        }
    }
}

/// Lobby / matchmaking parameters.
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Always 2 for this game; kept explicit so the pairing code reads
    /// against a named constant rather than a magic number.
    pub max_players_per_match: usize,
    pub ai_enabled: bool,
    pub ai_delay: Duration,
    pub human_only_max_wait: Duration,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            max_players_per_match: 2,
            ai_enabled: true,
            ai_delay: Duration::from_millis(4000),
            human_only_max_wait: Duration::from_millis(8000),
        }
    }
}

/// Per-match parameters.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub turn_time_limit: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_time_limit: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub catalog_path: String,
    pub log: LogConfig,
    pub lobby: LobbyConfig,
    pub game: GameConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port = env_parse("PORT", 3000u16)?;
        let catalog_path =
            std::env::var("CARD_CATALOG_PATH").unwrap_or_else(|_| "data/cars.json".to_string());

        let log = LogConfig {
            format: env_parse("LOG_FORMAT", LogFormat::Json)?,
            default_filter: std::env::var("LOG_FILTER")
                .unwrap_or_else(|_| LogConfig::default().default_filter),
        };

        let lobby = LobbyConfig {
            max_players_per_match: 2,
            ai_enabled: env_parse("AI_ENABLED", true)?,
            ai_delay: Duration::from_millis(env_parse("AI_DELAY_MS", 4000u64)?),
            human_only_max_wait: Duration::from_millis(env_parse(
                "HUMAN_ONLY_MAX_WAIT_MS",
                8000u64,
            )?),
        };

        let game = GameConfig {
            turn_time_limit: Duration::from_secs(env_parse("TURN_TIME_LIMIT_SECONDS", 30u64)?),
        };

        Ok(Self {
            port,
            catalog_path,
            log,
            lobby,
            game,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| AppError::Config {
            detail: format!("Invalid value for {key}: {raw:?}"),
        }),
        Err(_) => Ok(default),
    }
}
