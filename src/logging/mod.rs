use std::{
    collections::HashMap,
    fmt,
    fmt::Write as _,
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{format::DelayedFormat, DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

/// 單次寫入檔案前最多累積的位元組數
const FLUSH_THRESHOLD: usize = 2048;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn file_suffix(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Info => "Info",
            Level::Warn => "Warn",
            Level::Error => "Error",
            Level::Debug => "Debug",
        };
        f.write_str(s)
    }
}

pub struct LogMessage {
    pub level: Level,
    pub msg: String,
    pub created_at: DateTime<Local>,
}

impl LogMessage {
    pub fn new(level: Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

/// 以背景線程寫檔的日誌器，每個等級各自一個檔案
pub struct Logger {
    writer: Sender<LogMessage>,
}

impl Logger {
    pub fn new(log_name: &str) -> Self {
        let (tx, rx) = unbounded::<LogMessage>();
        let name = log_name.to_string();

        // 寫入檔案的操作使用另一個線程處理
        thread::spawn(move || Self::consume(&name, rx));

        Logger { writer: tx }
    }

    pub fn info(&self, log: String) {
        self.send(Level::Info, log);
    }

    pub fn warn(&self, log: String) {
        self.send(Level::Warn, log);
    }

    pub fn error(&self, log: String) {
        self.send(Level::Error, log);
    }

    pub fn debug(&self, log: String) {
        self.send(Level::Debug, log);
    }

    fn send(&self, level: Level, msg: String) {
        if let Err(why) = self.writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
    }

    fn consume(name: &str, rx: Receiver<LogMessage>) {
        let mut writers: HashMap<Level, (PathBuf, BufWriter<File>)> = HashMap::with_capacity(4);
        let mut pending: HashMap<Level, String> = HashMap::with_capacity(4);

        for received in &rx {
            let line = pending
                .entry(received.level)
                .or_insert_with(|| String::with_capacity(FLUSH_THRESHOLD));

            if writeln!(
                line,
                "{} {} {}",
                received.created_at.format("%F %X%.6f"),
                received.level,
                received.msg
            )
            .is_err()
            {
                continue;
            }

            if !rx.is_empty() && line.len() < FLUSH_THRESHOLD {
                continue;
            }

            let now = Local::now();
            for (level, buffered) in pending.iter_mut().filter(|(_, b)| !b.is_empty()) {
                let Some(writer) = Self::get_writer(&mut writers, name, *level, now) else {
                    error_console(format!("Failed to open {} log file.", level));
                    buffered.clear();
                    continue;
                };

                if let Err(why) = writer.write_all(buffered.as_bytes()) {
                    error_console(format!(
                        "Failed to write to log file. because:{:#?}\r\nmsg:{}",
                        why, buffered
                    ));
                }

                if let Err(why) = writer.flush() {
                    error_console(format!("Failed to flush log file. because:{:#?}", why));
                }

                buffered.clear();
            }
        }
    }

    /// 取得該等級的寫入器，日期變更時改開當天的檔案
    fn get_writer<'a>(
        writers: &'a mut HashMap<Level, (PathBuf, BufWriter<File>)>,
        name: &str,
        level: Level,
        now: DateTime<Local>,
    ) -> Option<&'a mut BufWriter<File>> {
        let path = Self::get_log_path(name, level, now)?;
        let reopen = writers
            .get(&level)
            .map_or(true, |(current, _)| *current != path);

        if reopen {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()?;
            writers.insert(level, (path, BufWriter::new(file)));
        }

        writers.get_mut(&level).map(|(_, writer)| writer)
    }

    fn get_log_path(name: &str, level: Level, now: DateTime<Local>) -> Option<PathBuf> {
        let path = Path::new("log");

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!(
            "{}_{}_{}.log",
            now.format("%Y-%m-%d"),
            name,
            level.file_suffix()
        ));

        Some(log_path)
    }
}

pub fn info_file_async(log: String) {
    LOGGER.info(log);
}

pub fn warn_file_async(log: String) {
    LOGGER.warn(log);
}

pub fn error_file_async(log: String) {
    LOGGER.error(log);
}

pub fn debug_file_async(log: String) {
    LOGGER.debug(log);
}

pub fn info_console(log: String) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        DelayedFormat::to_string(&Local::now().format("%Y-%m-%d %H:%M:%S.%3f")),
        log
    );
}
