use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::Result;
use color_eyre::eyre::Context;
use fern::colors::{Color, ColoredLevelConfig};

fn format_line(
    out: fern::FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
    level: &dyn std::fmt::Display,
) {
    out.finish(format_args!(
        "{} {}: {} [in {}:{}]",
        humantime::format_rfc3339_seconds(SystemTime::now()),
        level,
        message,
        record.file().unwrap_or("?"),
        record.line().unwrap_or(0),
    ))
}

/// Console output at `console_level`, plus an uncolored log file at
/// `file_level` when `log_file` is set.
pub fn setup_logging(
    console_level: log::LevelFilter,
    log_file: Option<PathBuf>,
    file_level: log::LevelFilter,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let console = fern::Dispatch::new()
        .level(console_level)
        .format(move |out, message, record| {
            format_line(out, message, record, &colors.color(record.level()))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new()
        .level(log::LevelFilter::Trace)
        // sqlx and hyper are noisy below info
        .level_for("sqlx", log::LevelFilter::Warn)
        .level_for("sea_orm", log::LevelFilter::Info)
        .level_for("hyper", log::LevelFilter::Info)
        .chain(console);

    if let Some(path) = log_file {
        let file = fern::log_file(&path)
            .wrap_err_with(|| format!("Failed to open log file: {}", path.display()))?;
        root = root.chain(
            fern::Dispatch::new()
                .level(file_level)
                .format(|out, message, record| {
                    format_line(out, message, record, &record.level())
                })
                .chain(file),
        );
    }

    root.apply().wrap_err("Failed to install logger")?;
    Ok(())
}
