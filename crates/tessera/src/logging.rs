//! Tracing setup for the CLI.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Console levels, unless `RUST_LOG` says otherwise.
fn console_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "tessera=debug,tessera_server=debug,tessera_session=debug,tower_http=debug,info"
    } else {
        "tessera=info,tessera_server=info,tessera_session=info,warn"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber.
///
/// Human-readable events go to the console. When a config directory exists,
/// every Tessera event down to `trace` is also written as JSON to
/// `<config dir>/logs/tessera.log`, rotated daily. The returned guard flushes
/// that file on drop and must be held for the life of the process.
pub fn init(verbose: bool) -> Option<WorkerGuard> {
    let (file_layer, guard) = match tessera_config::config_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), "tessera.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(
                    "tessera=trace,tessera_server=trace,tessera_session=trace,info",
                ));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(console_filter(verbose)),
        )
        .with(file_layer)
        .init();

    guard
}
