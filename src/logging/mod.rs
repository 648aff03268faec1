use std::thread;

use chrono::{DateTime, Local};
use concat_string::concat_string;
use once_cell::sync::Lazy;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use rotate::Rotate;

pub mod rotate;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("default"));

#[derive(Debug, Copy, Clone, PartialEq, strum::Display)]
pub enum Level {
    Error,
    Info,
    Debug,
}

pub struct Logger {
    writer: UnboundedSender<LogMessage>,
}

impl Logger {
    fn new(log_name: &str) -> Self {
        let (tx, mut rx) = unbounded_channel::<LogMessage>();
        let pattern = format!("log/%Y-%m-%d-{}.log", log_name);

        //寫入檔案的操作使用另一個線程處理
        thread::spawn(move || {
            let mut rotate = Rotate::new(pattern);
            let mut together = String::with_capacity(4096);

            while let Some(received) = rx.blocking_recv() {
                together.push_str(&concat_string!(
                    received.created_at.format("%F %X%.6f").to_string(),
                    " ",
                    received.level.to_string(),
                    " ",
                    received.msg,
                    "\r\n"
                ));

                if rx.is_empty() || together.len() >= 4096 {
                    if let Err(why) = rotate.write_msg(received.created_at, together.as_bytes()) {
                        error_console(format!("Failed to write log because {:?}", why));
                        info_console(together.clone());
                    }
                    rotate.flush();
                    together.clear();
                }
            }
        });

        Logger { writer: tx }
    }

    fn send(&self, level: Level, msg: String) {
        if let Err(why) = self.writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
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

pub fn info_file_async<S: Into<String>>(log: S) {
    LOGGER.send(Level::Info, log.into());
}

pub fn error_file_async<S: Into<String>>(log: S) {
    LOGGER.send(Level::Error, log.into());
}

/// 只在 debug build 寫入檔案
pub fn debug_file_async<S: Into<String>>(log: S) {
    if cfg!(debug_assertions) {
        LOGGER.send(Level::Debug, log.into());
    }
}

pub fn info_console<S: AsRef<str>>(log: S) {
    println!(
        "{} Info {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log.as_ref()
    );
}

pub fn error_console<S: AsRef<str>>(log: S) {
    eprintln!(
        "{} Error {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log.as_ref()
    );
}
