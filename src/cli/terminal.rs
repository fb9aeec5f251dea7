//! Terminal rendering of notifications and check results

use bloodlink::{Notification, NotificationKind, notification::Buttons};
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Extension trait for colorizing output by notification kind
pub trait Colorize {
    /// Color according to `kind`
    fn paint(&self, kind: NotificationKind) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn paint(&self, kind: NotificationKind) -> String {
        if !supports_color() {
            return self.to_string();
        }
        match kind {
            NotificationKind::Info => self.fg::<css::LightBlue>().to_string(),
            NotificationKind::Success => self.fg::<css::Green>().to_string(),
            NotificationKind::Warning => self.fg::<css::Orange>().to_string(),
            NotificationKind::Danger => self.fg::<css::Red>().to_string(),
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn paint(&self, kind: NotificationKind) -> String {
        self.as_str().paint(kind)
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

/// Prints a notification the way the modal surface would lay it out.
pub fn render<E>(notification: &Notification<E>) {
    let icon = match notification.kind() {
        NotificationKind::Info => "ℹ️ ",
        NotificationKind::Success => "✅",
        NotificationKind::Warning => "⚠️ ",
        NotificationKind::Danger => "❌",
    };
    println!(
        "{}",
        format!("{icon} {}", notification.title()).paint(notification.kind())
    );
    println!("{}", notification.message());
    let buttons = match notification.buttons() {
        Buttons::Acknowledge { label } => format!("[{label}]"),
        Buttons::ConfirmCancel { confirm, cancel } => format!("[{confirm}] [{cancel}]"),
    };
    println!("{}", buttons.dim());
}
