use std::{
    ops::Deref,
    sync::{Arc, Mutex},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crossbeam_channel::{RecvTimeoutError, Sender, unbounded};

use crate::{config::FWLOG_CONFIG, log_writer::LogWriter};

const BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMessage {
    /// A fully formatted line.
    Line(String),
    /// Drain the queue, flush and stop the writer thread.
    Shutdown,
}

/// Handle to a writer thread. Dropping the last handle shuts it down.
pub struct LogSender {
    sender: Sender<LogMessage>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Deref for LogSender {
    type Target = Sender<LogMessage>;
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
    pub fn new(sender: Sender<LogMessage>, handler: JoinHandle<()>) -> Self {
        Self {
            sender,
            handler: Mutex::new(Some(handler)),
        }
    }

    /// Queues a line; silently dropped once the thread has stopped.
    pub fn line(&self, line: String) {
        let _ = self.send(LogMessage::Line(line));
    }

    /// Flushes everything queued so far and joins the writer thread.
    /// Later calls do nothing.
    pub fn shutdown(&self) {
        let handle = match self.handler.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            // the channel may already be closed
            let _ = self.send(LogMessage::Shutdown);
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handler
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

pub fn spawn_log_thread<W: LogWriter + Send + 'static>(mut writer: W) -> LogSender {
    let (sender, receiver) = unbounded::<LogMessage>();
    let handler = std::thread::spawn(move || {
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        let flush_interval = Duration::from_millis(FWLOG_CONFIG.FLUSH_INTERVAL_MS);
        let mut last_flush = Instant::now();
        loop {
            let elapsed = last_flush.elapsed();
            let timeout = if elapsed >= flush_interval {
                Duration::from_millis(1)
            } else {
                flush_interval - elapsed
            };

            match receiver.recv_timeout(timeout) {
                Ok(msg) => {
                    batch.push(msg);
                    while let Ok(msg) = receiver.try_recv() {
                        batch.push(msg);
                        if batch.len() >= BATCH_SIZE {
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
                Err(RecvTimeoutError::Disconnected) => {
                    writer.flush();
                    break;
                }
            }

            let mut should_shutdown = false;
            for log_message in batch.drain(..) {
                match log_message {
                    LogMessage::Line(line) => writer.regular(&line),
                    LogMessage::Shutdown => {
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
    });
    LogSender::new(sender, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_writer::LogMemory;

    #[test]
    fn test_lines_are_written_in_order() {
        let memory = LogMemory::default();
        let sender = spawn_log_thread(memory.clone());
        for i in 0..100 {
            sender.line(format!("line {i}"));
        }
        sender.shutdown();
        let lines = memory.lines();
        assert_eq!(lines.len(), 100);
        assert_eq!(lines[0], "line 0");
        assert_eq!(lines[99], "line 99");
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let memory = LogMemory::default();
        let sender = spawn_log_thread(memory.clone());
        sender.line("before".into());
        assert!(sender.is_running());
        sender.shutdown();
        sender.shutdown();
        assert!(!sender.is_running());
        sender.line("after".into());
        drop(sender);
        assert_eq!(memory.lines(), vec!["before"]);
    }
}
