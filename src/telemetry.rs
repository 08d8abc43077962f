//! Process-wide tracing setup.
//!
//! The subscriber is installed once at startup from [`LogConfig`].
//! Match-layer events carry structured fields (`game_id`, `player_id`,
//! `bot_id`), so the JSON format is the production default; `plain` is
//! for reading a local run.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogConfig, LogFormat};

pub fn init_tracing(cfg: &LogConfig) {
    // RUST_LOG wins over the configured default filter.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.default_filter.clone()));

    let base = tracing_subscriber::registry().with(filter);
    match cfg.format {
        LogFormat::Json => base
            .with(fmt::layer().with_target(false).with_ansi(false).json())
            .init(),
        LogFormat::Plain => base.with(fmt::layer().with_target(false)).init(),
    }
}
