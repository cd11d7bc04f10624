//! Log setup
//!
//! The terminal owns stdout while the UI is running, so log output goes to
//! a file when one is configured and is dropped otherwise. The `CITYWX_LOG`
//! environment variable can adjust the level filter (default `info`).

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// With no log file configured this is a no-op: events are discarded rather
/// than scribbled over the alternate screen. An existing file at the path is
/// truncated.
///
/// # Arguments
/// * `log_file` - Path to write log lines to, if any
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_env("CITYWX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // A second call keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
