use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "cinema-server.log";

/// Initializes the global logger.
///
/// This should be called once at the very start of `main`. The level is
/// controlled by the `RUST_LOG` environment variable (e.g.
/// `RUST_LOG=debug`), defaulting to `info` when unset. `tracing` calls
/// (emitted by `axum`/`tower-http` request spans) are bridged into the
/// same `log` sink so the HTTP layer and the booking core share one log
/// stream.
pub fn init() {
    if let Err(e) = fs::create_dir_all(LOG_DIR) {
        eprintln!("Failed to create log directory at '{}': {}", LOG_DIR, e);
    }

    let log_file_path = format!("{}/{}", LOG_DIR, LOG_FILE);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level_filter = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let base_config = Dispatch::new().level(log_level_filter).level_for("hyper", LevelFilter::Warn).level_for("mio", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = fern::colors::ColoredLevelConfig::new()
                .error(fern::colors::Color::Red)
                .warn(fern::colors::Color::Yellow)
                .info(fern::colors::Color::Green)
                .debug(fern::colors::Color::Blue)
                .trace(fern::colors::Color::BrightBlack);

            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let file_config = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
        })
        .chain(fern::log_file(&log_file_path).unwrap_or_else(|e| {
            eprintln!("Failed to open log file '{}': {}", log_file_path, e);
            fern::log_file("/dev/stderr").expect("Failed to open stderr as fallback")
        }));

    base_config
        .chain(console_config)
        .chain(file_config)
        .apply()
        .unwrap_or_else(|e| {
            eprintln!("Failed to apply logger configuration: {}", e);
        });

    // Route `tracing` events (axum/tower-http spans) through the `log` facade
    // so both stacks end up in the same sink.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to install tracing-to-log bridge: {}", e);
    }

    log::info!("Logger initialized. Logging to console and '{}'.", log_file_path);
}
