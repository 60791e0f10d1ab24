use std::collections::VecDeque;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    created: Instant,
}

/// Transient notifications, newest first. Each one expires on its own.
#[derive(Debug, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message.into(), Instant::now());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message.into(), Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message.into(), Instant::now());
    }

    fn push(&mut self, level: ToastLevel, message: String, created: Instant) {
        self.items.push_front(Toast { level, message, created });
        self.items.truncate(MAX_TOASTS);
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|t| now.duration_since(t.created) < TOAST_TTL);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
