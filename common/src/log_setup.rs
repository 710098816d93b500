use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

/// Starts the process-wide logger.
///
/// Log files go to `logs/` and rotate at 1MB, keeping the last five. Everything
/// is echoed to stdout and warnings additionally to stderr. The returned handle
/// must outlive the run, dropping it stops the file writer.
pub fn setup_logging(base_level: &str) -> anyhow::Result<LoggerHandle> {
    Logger::try_with_env_or_str(base_level)
        .with_context(|| format!("Invalid log filter: {base_level}"))?
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .suppress_timestamp(),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .context("Logger initialization failed")
}
