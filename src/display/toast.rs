//! Transient notifications
//!
//! A [`ToastCenter`] keeps the toasts currently on screen. Each one closes
//! itself five seconds after it was shown, or earlier via
//! [`ToastCenter::dismiss`].

use crossterm::style::{Color, Stylize};
use std::fmt;
use std::time::{Duration, Instant};

pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    fn symbol(self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ️",
            ToastKind::Success => "✅",
            ToastKind::Error => "❌",
            ToastKind::Warning => "⚠️",
        }
    }

    fn color(self) -> Color {
        match self {
            ToastKind::Info => Color::Blue,
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
            ToastKind::Warning => Color::Yellow,
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
        };
        f.write_str(name)
    }
}

pub type ToastId = u64;

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_LIFETIME
    }

    /// Uncolored single-line form
    pub fn render_plain(&self) -> String {
        format!(" {} {}", self.kind.symbol(), self.message)
    }
}

#[derive(Debug)]
pub struct ToastCenter {
    toasts: Vec<Toast>,
    next_id: ToastId,
    use_colors: bool,
}

impl Default for ToastCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastCenter {
    pub fn new() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            use_colors: true,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Record a toast and echo it to the terminal
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let toast = self.push(message.into(), kind, Instant::now());
        self.print(&toast);
        toast.id
    }

    /// Record without printing; `now` is when it appeared
    pub fn push(&mut self, message: String, kind: ToastKind, now: Instant) -> Toast {
        match kind {
            ToastKind::Error => log::error!("{}", message),
            ToastKind::Warning => log::warn!("{}", message),
            ToastKind::Info | ToastKind::Success => log::info!("{}", message),
        }

        let toast = Toast {
            id: self.next_id,
            message,
            kind,
            created_at: now,
        };
        self.next_id += 1;
        self.toasts.push(toast.clone());
        toast
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop expired toasts; returns how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|t| !t.is_expired(now));
        before - self.toasts.len()
    }

    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    fn print(&self, toast: &Toast) {
        let line = toast.render_plain();
        let line = if self.use_colors {
            line.with(toast.kind.color()).to_string()
        } else {
            line
        };

        match toast.kind {
            ToastKind::Error | ToastKind::Warning => eprintln!("{}", line),
            ToastKind::Info | ToastKind::Success => println!("{}", line),
        }
    }
}
