use anyhow::{Context, Result};
use camino::Utf8Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with a daily-rotating file appender and, optionally, a
/// console layer.
///
/// Diagnostics default to the file under `log_dir` because terminal hosts use
/// stdout as their rendering canvas; pass `console_output = true` only when
/// nothing is being painted. `RUST_LOG` overrides the level chosen by
/// `debug_mode`.
///
/// The returned guard flushes the non-blocking writer on drop and must be
/// held for the lifetime of the program.
pub fn setup_logging(
    log_dir: &str,
    log_prefix: &str,
    debug_mode: bool,
    console_output: bool,
) -> Result<WorkerGuard> {
    let dir = Utf8Path::new(log_dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {dir}"))?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, log_prefix));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug_mode { "debug" } else { "info" })
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // An `Option<Layer>` is itself a layer; `None` is a no-op.
    let console_layer = console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!(
        log_dir = %dir,
        log_prefix,
        debug_mode,
        console_output,
        "logging initialized"
    );

    Ok(guard)
}
