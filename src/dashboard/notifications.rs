//! Toast notifications.
//!
//! Workflows and views never print directly. The shell turns their results
//! into [`Toast`]s and queues them on a [`ToastSender`]; a single printer task
//! drains the channel. A closed channel only loses the message.

use std::io::Write;
use std::time::Duration;

use console::style;
use serde::Serialize;
use strum::Display;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::services::Outcome;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(2500);
pub const ERROR_DURATION: Duration = Duration::from_millis(3000);
pub const WARNING_DURATION: Duration = Duration::from_millis(5000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
            duration: DEFAULT_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Info)
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Capacity rejections stay up longest; other failures a little longer than
    /// the default.
    pub fn from_error(err: &ServiceError) -> Self {
        match err {
            ServiceError::OverCapacity(_) => Self::new(err.toast_message(), ToastLevel::Warning)
                .with_duration(WARNING_DURATION),
            ServiceError::ValidationError(_) => {
                Self::new(err.toast_message(), ToastLevel::Warning)
            }
            _ => Self::new(err.toast_message(), ToastLevel::Error).with_duration(ERROR_DURATION),
        }
    }

    pub fn from_result(result: &Result<Outcome, ServiceError>) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome.message.clone()),
            Err(err) => Self::from_error(err),
        }
    }

    fn render(&self) -> String {
        let tag = format!("[{}]", self.level);
        let tag = match self.level {
            ToastLevel::Success => style(tag).green(),
            ToastLevel::Info => style(tag).cyan(),
            ToastLevel::Warning => style(tag).yellow(),
            ToastLevel::Error => style(tag).red(),
        };
        format!("{} {}", tag, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ToastSender {
    sender: mpsc::Sender<Toast>,
}

impl ToastSender {
    pub fn new(sender: mpsc::Sender<Toast>) -> Self {
        Self { sender }
    }

    /// Queues a toast. Failing to deliver one is logged and otherwise ignored.
    pub async fn send(&self, toast: Toast) {
        if let Err(e) = self.sender.send(toast).await {
            warn!(message = %e.0.message, "toast dropped: printer is gone");
        }
    }
}

/// Creates the toast channel. Dropping every sender ends the printer.
pub fn channel(buffer: usize) -> (ToastSender, mpsc::Receiver<Toast>) {
    let (tx, rx) = mpsc::channel(buffer);
    (ToastSender::new(tx), rx)
}

/// Prints toasts until the channel closes and hands the writer back.
/// With `json` set each toast is written as one JSON object per line.
pub async fn process_toasts<W: Write + Send>(
    mut rx: mpsc::Receiver<Toast>,
    mut out: W,
    json: bool,
) -> W {
    while let Some(toast) = rx.recv().await {
        debug!(level = %toast.level, "toast");
        let line = if json {
            serde_json::to_string(&toast).unwrap_or_else(|_| toast.message.clone())
        } else {
            toast.render()
        };
        if let Err(e) = writeln!(out, "{}", line) {
            warn!(error = %e, "failed to print toast");
        }
    }
    let _ = out.flush();
    out
}
