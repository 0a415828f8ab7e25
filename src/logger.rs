use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub struct Logger {
    pub write_to_stderr: bool,
    pub severity: Level,
    pub file: Option<Arc<Mutex<File>>>,
    pub enable_colors: bool,
}

impl Logger {
    /// Create a new logger. When `file_path` is given, records are also
    /// appended to that file (without colours).
    pub fn new(
        file_path: Option<PathBuf>,
        severity: Option<Level>,
        write_to_stderr: bool,
        enable_colors: bool,
    ) -> Self {
        // Create log directory if it doesn't exist
        if let Some(parent) = file_path.as_ref().and_then(|p| p.parent()) {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = file_path
            .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok())
            .map(|f| Arc::new(Mutex::new(f)));

        Logger {
            write_to_stderr,
            severity: severity.unwrap_or(Level::Info),
            file,
            enable_colors,
        }
    }

    fn get_timestamp() -> String {
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default()
    }

    /// Get color code for log level
    fn get_color(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1b[31m", // Red
            Level::Warn => "\x1b[33m",  // Yellow
            Level::Info => "\x1b[36m",  // Cyan
            Level::Debug => "\x1b[35m", // Magenta
            Level::Trace => "\x1b[37m", // White
        }
    }

    fn get_reset() -> &'static str {
        "\x1b[0m"
    }

    /// Initialize logger with environment variables
    ///
    /// `MDWIKI_LOG` (or `RUST_LOG`) sets the level, `MDWIKI_LOG_FILE` adds a
    /// file sink, `NO_COLOR` disables ANSI colours.
    pub fn init() -> Result<(), log::SetLoggerError> {
        let severity = std::env::var("MDWIKI_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::Info);

        let file_path = std::env::var("MDWIKI_LOG_FILE").ok().map(PathBuf::from);
        let enable_colors = std::env::var("NO_COLOR").is_err();

        let logger = Logger::new(file_path, Some(severity), true, enable_colors);
        log::set_max_level(LevelFilter::Trace);
        log::set_logger(Box::leak(Box::new(logger)))?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.severity
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Self::get_timestamp();
        let level_str = record.level().as_str();
        let args = record.args();

        let formatted_message = if self.enable_colors {
            let color = Self::get_color(record.level());
            let reset = Self::get_reset();
            format!("{color}[{timestamp}] {level_str}{reset} {args}\n")
        } else {
            format!("[{timestamp}] {level_str} {args}\n")
        };

        if self.write_to_stderr {
            let _ = std::io::stderr().write_all(formatted_message.as_bytes());
        }

        // Write to file (without colors)
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let _ = writeln!(file_guard, "[{timestamp}] {level_str} {args}");
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = &self.file {
            if let Ok(mut file_guard) = file.lock() {
                let _ = file_guard.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_severity_filter() {
        let logger = Logger::new(None, Some(Level::Warn), false, false);
        let warn = Metadata::builder().level(Level::Warn).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&warn));
        assert!(!logger.enabled(&debug));
    }

    #[test]
    fn test_file_sink_has_no_colors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("wiki.log");
        let logger = Logger::new(Some(path.clone()), None, false, true);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("saved page"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("INFO saved page"));
        assert!(!written.contains('\x1b'));
    }
}
