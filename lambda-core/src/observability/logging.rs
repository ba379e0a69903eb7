use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::sync::OnceLock;

use crate::config::{LogFormat, LoggingConfig};

static LOG_INIT: OnceLock<()> = OnceLock::new();

/// Install the global subscriber. Only the first call has an effect, and a
/// subscriber installed by the host application is left alone.
pub fn setup_logging(config: &LoggingConfig) {
    LOG_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);

        let installed = match config.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("global subscriber already installed; keeping it");
        }
    });
}

#[macro_export]
macro_rules! log_turn {
    ($level:ident, $($arg:tt)*) => {
        tracing::$level!(
            target: "turn",
            $($arg)*
        );
    };
}

#[macro_export]
macro_rules! log_tool {
    ($level:ident, $tool:expr, $($arg:tt)*) => {
        tracing::$level!(
            target: "tool",
            tool = $tool,
            $($arg)*
        );
    };
}
