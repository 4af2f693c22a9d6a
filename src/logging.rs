//! `tracing` subscriber setup.
//!
//! Logs go to stderr so stdout only carries reports. `RUST_LOG` overrides the
//! level passed on the command line.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

pub fn init_logging(level: &str) -> Result<(), AppError> {
    let default_filter = format!("neyman_belt={level}");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(level, "logging initialized");
    Ok(())
}
