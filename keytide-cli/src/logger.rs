use std::{fs::File, path::Path};

use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs into `path` since the terminal belongs to the UI.
pub fn init(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(file)
        .without_time();

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_env(EnvFilter::DEFAULT_ENV))
        .init();

    debug!("Logger initialised!");
    Ok(())
}
