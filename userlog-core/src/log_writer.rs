use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

pub trait LogWriter {
    fn regular(&mut self, line: &str);
    fn flush(&mut self);
    /// Whether levels should be rendered with terminal colours.
    fn colored(&self) -> bool {
        false
    }
}

/// Append-only log file.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, line: &str) {
        // a failing sink must not take the logging thread down
        writeln!(self.file, "{line}").ok();
    }

    fn flush(&mut self) {
        self.file.flush().ok();
    }
}

#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn regular(&mut self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}").ok();
        stdout.flush().ok();
    }

    fn flush(&mut self) {
        std::io::stdout().flush().ok();
    }

    fn colored(&self) -> bool {
        true
    }
}

/// In-memory sink, typically used to hand user-facing lines back to a caller.
///
/// Clones share the same lines.
#[derive(Default, Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl LogWriter for LogBuffer {
    fn regular(&mut self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    fn flush(&mut self) {}
}

#[test]
fn test_log_file() {
    std::fs::remove_file("/tmp/test_userlog_file.log").ok();
    let mut log_file = LogFile::new("/tmp/test_userlog_file.log").unwrap();
    log_file.regular("Hello, world!");
    log_file.regular("rust is awesome !");
    log_file.flush();
    drop(log_file);
    let mut log_file = LogFile::new("/tmp/test_userlog_file.log").unwrap();
    log_file.regular("appended");
    log_file.flush();
    assert_eq!(
        std::fs::read_to_string("/tmp/test_userlog_file.log").unwrap(),
        "Hello, world!\nrust is awesome !\nappended\n"
    );
}

#[test]
fn test_log_buffer_shares_lines() {
    let buffer = LogBuffer::new();
    let mut writer = buffer.clone();
    writer.regular("first");
    writer.regular("second");
    assert_eq!(buffer.lines(), vec!["first", "second"]);
    assert_eq!(buffer.take().len(), 2);
    assert!(buffer.lines().is_empty());
}
