use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "task-manager";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 100 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 30;

const DEFAULT_SPEC: &str = "warn,task_manager=info";

/// Returns the directory log files are written to. Kept next to the host's
/// app data so users find logs where the rest of the app lives.
pub fn log_directory(app_data_dir: &Path) -> &Path {
    app_data_dir
}

fn log_spec() -> String {
    // `TASK_MANAGER_LOG` wins, then `RUST_LOG`, then the default.
    std::env::var("TASK_MANAGER_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_SPEC.to_string())
}

/// Initializes the file logger for an embedding host. Call once at startup.
pub fn init_logging(app_data_dir: &Path) -> Result<(), flexi_logger::FlexiLoggerError> {
    use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, Naming};

    std::fs::create_dir_all(app_data_dir)?;

    Logger::try_with_str(log_spec())?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory(app_data_dir))
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        log_directory(app_data_dir).display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(())
}

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

        // Best-effort: even if the logger is unavailable, still run the default hook.
        log::error!("panic: payload={payload} location={location}\nbacktrace:\n{backtrace}");
        default_hook(info);
    }));
}
