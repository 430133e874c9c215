use chrono::Local;
use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_FILE: &str = "logs/system.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where and how much the binary logs.
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Overrides `RUST_LOG` when set.
    pub level: Option<LevelFilter>,
    /// `None` disables the log file and keeps console output only.
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        LogOptions { level: None, file: Some(PathBuf::from(DEFAULT_LOG_FILE)) }
    }
}

impl LogOptions {
    /// `options.level`, else `RUST_LOG`, else `info`.
    fn effective_level(&self) -> LevelFilter {
        self.level.unwrap_or_else(|| std::env::var("RUST_LOG").ok().and_then(|raw| raw.parse().ok()).unwrap_or(LevelFilter::Info))
    }
}

fn console_dispatch() -> Dispatch {
    let colors = ColoredLevelConfig::new().error(Color::Red).warn(Color::Yellow).info(Color::Green).debug(Color::Blue).trace(Color::BrightBlack);

    Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr())
}

fn file_dispatch(path: &Path) -> std::io::Result<Dispatch> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    Ok(Dispatch::new()
        .format(|out, message, record| out.finish(format_args!("[{} {} {}] {}", Local::now().format(TIMESTAMP_FORMAT), record.level(), record.target(), message)))
        .chain(fern::log_file(path)?))
}

/// Installs the global logger. Call once, from `main`.
///
/// Library code only emits through the `log` facade. A log file that cannot
/// be opened is reported on stderr and logging continues on the console.
pub fn init(options: &LogOptions) {
    let mut dispatch = Dispatch::new().level(options.effective_level()).level_for("serde", LevelFilter::Warn).chain(console_dispatch());

    if let Some(path) = &options.file {
        match file_dispatch(path) {
            Ok(file) => dispatch = dispatch.chain(file),
            Err(e) => eprintln!("Failed to open log file '{}': {}. Logging to console only.", path.display(), e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
    }
}
