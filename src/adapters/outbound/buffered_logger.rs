use crate::domains::logger::{DomainLogger, DynLogger, LogLevel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

struct BufferedLogger {
    sender: mpsc::Sender<(LogLevel, String)>,
    dropped: Arc<AtomicUsize>,
}

impl BufferedLogger {
    fn push(&self, level: LogLevel, msg: &str) {
        // the tick never waits on the sink
        if self.sender.try_send((level, msg.to_string())).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl DomainLogger for BufferedLogger {
    fn info(&self, msg: &str) {
        self.push(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(LogLevel::Error, msg);
    }
}

/// Hands lines to `bridge` from a background tokio task. When the channel is full
/// lines are dropped and the count is reported with the next line that gets through.
/// Must be called from within a tokio runtime.
pub fn init_buffered_logger(bridge: DynLogger, capacity: usize) -> DynLogger {
    let (sender, mut receiver) = mpsc::channel::<(LogLevel, String)>(capacity.max(1));
    let dropped = Arc::new(AtomicUsize::new(0));

    let lost = dropped.clone();
    tokio::spawn(async move {
        while let Some((level, msg)) = receiver.recv().await {
            let missed = lost.swap(0, Ordering::Relaxed);
            if missed > 0 {
                bridge.warn(&format!("{} log lines dropped (buffer full)", missed));
            }
            bridge.log(level, &msg);
        }
    });

    Arc::new(BufferedLogger { sender, dropped })
}
