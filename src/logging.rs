use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "planner";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 10;

/// Log files live next to the persisted entries.
pub fn log_directory(data_dir: &Path) -> &Path {
    data_dir
}

/// `PLANNER_LOG` first, then `RUST_LOG`, then the build-dependent default.
pub fn log_spec(planner_log: Option<String>, rust_log: Option<String>, debug: bool) -> String {
    let default_spec = if debug {
        "warn,client_planner_lib=debug"
    } else {
        "warn,client_planner_lib=info"
    };
    planner_log
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| default_spec.to_string())
}

/// Starts file logging under `data_dir`, or stderr-only logging when there is
/// no data directory. Keep the returned handle alive for the whole run.
#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(
    data_dir: Option<&Path>,
) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    use flexi_logger::{
        detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode,
    };

    let spec = log_spec(
        std::env::var("PLANNER_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        cfg!(debug_assertions),
    );

    let Some(data_dir) = data_dir else {
        let handle = Logger::try_with_str(spec)?.log_to_stderr().start()?;
        install_panic_hook();
        log::info!("logger initialized target=stderr");
        return Ok(handle);
    };

    std::fs::create_dir_all(data_dir)?;

    // The shell owns stdout; only warnings and errors are echoed to stderr.
    let handle = Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory(data_dir))
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        log_directory(data_dir).display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(handle)
}

#[cfg(all(feature = "app", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map(|loc| format!("{loc}"))
            .unwrap_or_else(|| "<unknown>".to_string());
        let backtrace = std::backtrace::Backtrace::force_capture();

        log::error!("panic: payload={payload} location={location}\nbacktrace:\n{backtrace}");
        default_hook(info);
    }));
}
