//! User-facing notices with an auto-dismiss timer owned by the notifier.
//!
//! Showing a new notice cancels the pending dismissal and starts a fresh one,
//! so a quick succession of notices never clears the newest one early.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// Holds the current notice and its dismissal timer.
#[derive(Debug)]
pub struct Notifier {
    tx: watch::Sender<Option<Notice>>,
    dismiss_after: Option<Duration>,
    timer: Option<JoinHandle<()>>,
}

impl Notifier {
    /// `dismiss_after` of `None` keeps notices until replaced or dismissed.
    pub fn new(dismiss_after: Option<Duration>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx,
            dismiss_after,
            timer: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notice>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<Notice> {
        self.tx.borrow().clone()
    }

    /// Replace the current notice. Must run inside a Tokio runtime when a
    /// dismiss delay is configured.
    pub fn show(&mut self, notice: Notice) {
        self.cancel_timer();

        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "Notice"),
            _ => tracing::info!(message = %notice.message, "Notice"),
        }
        self.tx.send_replace(Some(notice.clone()));

        if let Some(delay) = self.dismiss_after {
            let tx = self.tx.clone();
            self.timer = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                tx.send_if_modified(|current| {
                    if current.as_ref() == Some(&notice) {
                        *current = None;
                        true
                    } else {
                        false
                    }
                });
            }));
        }
    }

    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.tx.send_replace(None);
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
