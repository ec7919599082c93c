use std::{
    ops::Deref,
    sync::{Arc, Mutex, PoisonError},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use chrono::Utc;
use colored::Colorize;
use crossbeam_channel::{RecvTimeoutError, Sender, unbounded};
use log::Level;

use crate::{
    LogContext,
    log_writer::{LogFile, LogWriter},
};

/// Guard that ensures the logger is properly shut down when dropped.
/// Hold this guard for the lifetime of your logging session.
pub struct LoggerGuard {
    senders: Vec<Arc<LogSender>>,
}

impl LoggerGuard {
    pub fn new(senders: Vec<Arc<LogSender>>) -> Self {
        Self { senders }
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        for sender in &self.senders {
            sender.shutdown();
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogMessage {
    pub message: String,
    pub level: Level,
    /// Name of the logger the record was emitted on.
    pub name: String,
    pub fields: Vec<(&'static str, String)>,
}

impl LogMessage {
    pub fn new(record: &log::Record, context: &LogContext) -> Self {
        Self {
            message: record.args().to_string(),
            level: record.level(),
            name: record.target().to_string(),
            fields: context.fields(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LogEvent {
    Record(Arc<LogMessage>),
    Shutdown,
}

pub struct LogSender {
    sender: Sender<LogEvent>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Deref for LogSender {
    type Target = Sender<LogEvent>;
    fn deref(&self) -> &Self::Target {
        &self.sender
    }
}

impl Drop for LogSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LogSender {
    pub fn new(sender: Sender<LogEvent>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Stops the writer thread once every queued line has been written.
    /// Calling it again is a no-op.
    pub fn shutdown(&self) {
        let mut guard = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = guard.take() {
            // the thread may already be gone, joining is enough then
            let _ = self.send(LogEvent::Shutdown);
            let _ = handle.join();
        }
    }
}

pub fn format_log(message: &LogMessage, colored: bool) -> String {
    let time = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f");
    let level = match message.level {
        Level::Error => "ERROR".red(),
        Level::Warn => "WARN".yellow(),
        Level::Info => "INFO".green(),
        Level::Debug => "DEBUG".blue(),
        Level::Trace => "TRACE".purple(),
    };
    let level = if colored {
        level.to_string()
    } else {
        level.clear().to_string()
    };
    let mut header = format!("{time} {} {level}", message.name);
    for (label, value) in &message.fields {
        header.push_str(&format!(" {label}={value}"));
    }
    format!("[{header}] {}", message.message)
}

/// Spawns a thread writing every line as soon as it arrives.
pub fn spawn_log_thread<W: LogWriter + Send + 'static>(mut writer: W) -> LogSender {
    let (sender, receiver) = unbounded::<LogEvent>();
    let handler = std::thread::spawn(move || {
        let colored = writer.colored();
        while let Ok(event) = receiver.recv() {
            match event {
                LogEvent::Record(message) => writer.regular(&format_log(&message, colored)),
                LogEvent::Shutdown => break,
            }
        }
        writer.flush();
    });
    LogSender::new(sender, handler)
}

/// Spawns a thread writing to a file in batches, flushing every `flush_interval`.
pub fn spawn_log_thread_file(mut writer: LogFile, flush_interval: Duration) -> LogSender {
    let (sender, receiver) = unbounded::<LogEvent>();
    let handler = std::thread::spawn(move || {
        let mut batch = Vec::with_capacity(32);
        let mut last_flush = Instant::now();
        loop {
            // Calculate timeout until next flush
            let elapsed = last_flush.elapsed();
            let timeout = if elapsed >= flush_interval {
                Duration::from_millis(1)
            } else {
                flush_interval - elapsed
            };

            match receiver.recv_timeout(timeout) {
                Ok(event) => {
                    batch.push(event);
                    while let Ok(event) = receiver.try_recv() {
                        batch.push(event);
                        if batch.len() >= 32 {
                            break;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if last_flush.elapsed() >= flush_interval {
                        writer.flush();
                        last_flush = Instant::now();
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }

            let mut should_shutdown = false;
            for event in batch.drain(..) {
                match event {
                    LogEvent::Record(message) => writer.regular(&format_log(&message, false)),
                    LogEvent::Shutdown => {
                        should_shutdown = true;
                        break;
                    }
                }
            }

            if should_shutdown || last_flush.elapsed() >= flush_interval {
                writer.flush();
                last_flush = Instant::now();
            }

            if should_shutdown {
                break;
            }
        }
        writer.flush();
    });
    LogSender::new(sender, handler)
}
