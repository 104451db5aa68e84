use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::sync::Mutex;

use crate::config::LogConfig;

const DEBUG_LOG_FILE: &str = "debug.log";
const TRACE_LOG_FILE: &str = "trace.log";

fn level_str(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

fn open_log_file(path: &str) -> io::Result<Mutex<LineWriter<File>>> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(Mutex::new(LineWriter::new(file)))
}

/// Where records go once they pass the level filter.
enum Sink {
    Console,
    ConsoleAndFile(Mutex<LineWriter<File>>),
    File(Mutex<LineWriter<File>>),
}

struct ScriptLogger {
    level: LevelFilter,
    sink: Sink,
}

impl ScriptLogger {
    fn write_file(writer: &Mutex<LineWriter<File>>, record: &Record) {
        // a poisoned writer only loses log lines
        if let Ok(mut writer) = writer.lock() {
            let _ = writeln!(
                writer,
                "[{:<5} {} {}] {}",
                level_str(record.level()),
                Local::now().format("%H:%M:%S%.6f"),
                record.module_path().unwrap_or("???"),
                record.args()
            );
        }
    }

    fn write_console(record: &Record) {
        eprintln!(
            "[{:<5} {}] {}",
            level_str(record.level()),
            Local::now().format("%H:%M:%S%.3f"),
            record.args()
        )
    }

    fn file(&self) -> Option<&Mutex<LineWriter<File>>> {
        match &self.sink {
            Sink::Console => None,
            Sink::ConsoleAndFile(writer) | Sink::File(writer) => Some(writer),
        }
    }
}

impl Log for ScriptLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match &self.sink {
            Sink::Console => Self::write_console(record),
            Sink::ConsoleAndFile(writer) => {
                Self::write_file(writer, record);
                Self::write_console(record);
            }
            Sink::File(writer) => Self::write_file(writer, record),
        }
    }

    fn flush(&self) {
        if let Some(writer) = self.file() {
            if let Ok(mut writer) = writer.lock() {
                let _ = writer.flush();
            }
        }
    }
}

impl Drop for ScriptLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

fn build_logger(config: &LogConfig) -> io::Result<Option<ScriptLogger>> {
    let logger = match config {
        LogConfig::NoLog | LogConfig::Verbose(0) => return Ok(None),
        LogConfig::Verbose(1) => ScriptLogger {
            level: LevelFilter::Info,
            sink: Sink::Console,
        },
        LogConfig::Verbose(2) => ScriptLogger {
            level: LevelFilter::Debug,
            sink: Sink::Console,
        },
        LogConfig::Verbose(3) => ScriptLogger {
            level: LevelFilter::Debug,
            sink: Sink::ConsoleAndFile(open_log_file(DEBUG_LOG_FILE)?),
        },
        LogConfig::Verbose(_) | LogConfig::Trace => ScriptLogger {
            level: LevelFilter::Trace,
            sink: Sink::File(open_log_file(TRACE_LOG_FILE)?),
        },
    };
    Ok(Some(logger))
}

pub fn init_log(config: &LogConfig) {
    let logger = match build_logger(config) {
        Ok(Some(logger)) => logger,
        Ok(None) => return,
        Err(err) => {
            eprintln!("cannot open log file, logging to console only: {}", err);
            ScriptLogger {
                level: LevelFilter::Debug,
                sink: Sink::Console,
            }
        }
    };
    let level = logger.level;
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
