use std::{
    fs::File,
    io::{BufWriter, Write},
    sync::{Arc, Mutex},
};

/// Destination of formatted lines. Implementations swallow I/O errors:
/// losing a log line must never bring the caller down.
pub trait LogWriter {
    fn regular(&mut self, line: &str);
    fn flush(&mut self);
}

impl<W: LogWriter + ?Sized> LogWriter for Box<W> {
    fn regular(&mut self, line: &str) {
        (**self).regular(line)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn regular(&mut self, line: &str) {
        let _ = writeln!(self.file, "{line}");
    }

    fn flush(&mut self) {
        let _ = self.file.flush();
    }
}

#[test]
fn test_log_file() {
    let path = std::env::temp_dir().join("fwlog_test_log_file.log");
    std::fs::remove_file(&path).ok();
    let mut log_file = LogFile::new(&path).unwrap();
    log_file.regular("Hello, world!");
    log_file.regular("rust is awesome !");
    log_file.flush();
    drop(log_file);
    let mut log_file = LogFile::new(&path).unwrap();
    log_file.regular("test");
    log_file.flush();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "Hello, world!\nrust is awesome !\ntest\n"
    );
}

#[derive(Default, Debug)]
pub struct LogStdout;

impl LogWriter for LogStdout {
    fn regular(&mut self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }

    fn flush(&mut self) {
        let _ = std::io::stdout().flush();
    }
}

/// Default console stream.
#[derive(Default, Debug)]
pub struct LogStderr;

impl LogWriter for LogStderr {
    fn regular(&mut self, line: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&mut self) {
        let _ = std::io::stderr().flush();
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Default, Debug, Clone)]
pub struct LogMemory {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LogMemory {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LogWriter for LogMemory {
    fn regular(&mut self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }

    fn flush(&mut self) {}
}

#[test]
fn test_log_memory_shares_buffer() {
    let memory = LogMemory::default();
    let mut writer = memory.clone();
    writer.regular("first");
    writer.regular("second\nwith continuation");
    assert_eq!(memory.lines(), vec!["first", "second\nwith continuation"]);
}

#[test]
fn test_console_writers() {
    LogStdout.regular("Hello, stdout!");
    LogStdout.flush();
    LogStderr.regular("Hello, stderr!");
    LogStderr.flush();
}
