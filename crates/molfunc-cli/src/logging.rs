use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Environment variable holding filter directives (e.g. `molfunc::engine=trace`).
/// Ignored under `--quiet`.
pub const LOG_ENV_VAR: &str = "MOLFUNC_LOG";

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn build_filter(verbosity: u8, quiet: bool, directives: Option<&str>) -> EnvFilter {
    let level = level_filter(verbosity, quiet);
    match directives {
        Some(directives) if !quiet => EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(directives),
        _ => EnvFilter::default().add_directive(level.into()),
    }
}

/// Installs the global subscriber.
///
/// Console output is compact and goes to stderr. With `log_file`, a plain-text copy
/// is written as well, including span close events so that the build and placement
/// phases are logged with their timings.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let directives = std::env::var(LOG_ENV_VAR).ok();
    let filter = build_filter(verbosity, quiet, directives.as_deref());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = log_file
        .map(|path| File::create(&path).map_err(CliError::Io))
        .transpose()?
        .map(|file| {
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_span_events(FmtSpan::CLOSE)
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, info_span, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("Failed to set up global logger for tests");
        });
    }

    #[test]
    fn verbosity_maps_to_level_filter() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(7, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn env_directives_widen_the_filter() {
        let filter = build_filter(0, false, Some("molfunc=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));

        let plain = build_filter(1, false, None);
        assert_eq!(plain.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn quiet_ignores_env_directives() {
        let filter = build_filter(0, true, Some("molfunc=trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    #[serial]
    fn global_logger_accepts_events() {
        ensure_global_logger_is_set();

        warn!(sites = 2, "Fewer fragments than sites");
        info!("Combined molecule assembled.");
        debug!(angle = 35.0, "Fragment rotation selected");
    }

    #[test]
    #[serial]
    fn second_installation_is_an_error_not_a_panic() {
        ensure_global_logger_is_set();
        assert!(matches!(
            setup_logging(0, false, None),
            Err(CliError::Other(_))
        ));
    }

    #[test]
    #[serial]
    fn file_layer_records_span_timings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("molfunc.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            info_span!("build_workflow").in_scope(|| {
                info!(n_atoms = 6, "Build complete.");
            });
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Build complete."));
        assert!(content.contains("build_workflow"));
        assert!(content.contains("time.busy"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_an_io_error() {
        let invalid_path = PathBuf::from("/");

        if cfg!(unix) && invalid_path.is_dir() {
            let result = setup_logging(0, false, Some(invalid_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
