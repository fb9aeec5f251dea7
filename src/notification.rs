//! The confirm/notify surface shared by every page.
//!
//! Pages describe what to tell the user with a [`Notification`] and hand it to
//! a [`Notifier`]. The notifier owns the single visible notification and runs
//! the supplied callbacks when the user confirms or dismisses it. It performs
//! no I/O, navigation or storage of its own.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Config;

/// A callback run when a notification is confirmed or dismissed.
pub type Callback<E> = Box<dyn FnOnce() -> Result<(), E>>;

/// The intent of a notification, which decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral information.
    Info,
    /// An action succeeded.
    Success,
    /// Something needs attention, or a reversible action needs confirming.
    Warning,
    /// An action failed, or a destructive action needs confirming.
    Danger,
}

impl NotificationKind {
    /// Whether this kind is used to confirm a risky action.
    #[must_use]
    pub const fn is_destructive(self) -> bool {
        matches!(self, Self::Warning | Self::Danger)
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        })
    }
}

/// A screen coordinate a notification can be attached to, such as the
/// position of the click that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Horizontal position in pixels.
    pub x: i32,
    /// Vertical position in pixels.
    pub y: i32,
}

/// Where the rendering surface should draw the visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Centred on screen.
    Centered,
    /// Near an anchor point, raised by the configured offset.
    Anchored {
        /// Horizontal position in pixels.
        x: i32,
        /// Vertical position in pixels.
        y: i32,
    },
}

/// The buttons a notification offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Buttons<'a> {
    /// A single button that acknowledges the notification.
    Acknowledge {
        /// Button label.
        label: &'a str,
    },
    /// A confirm button and a cancel button.
    ConfirmCancel {
        /// Label of the confirming button.
        confirm: &'a str,
        /// Label of the cancelling button.
        cancel: &'a str,
    },
}

/// A user response to the visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The confirm or acknowledge button.
    Confirm,
    /// The cancel button.
    Cancel,
    /// The close button.
    Close,
    /// A click on the backdrop.
    Backdrop,
}

/// A description of what to tell the user, and what to do when they respond.
pub struct Notification<E = anyhow::Error> {
    kind: NotificationKind,
    title: String,
    message: String,
    confirm_text: Option<String>,
    cancel_text: Option<String>,
    anchor: Option<Anchor>,
    on_confirm: Option<Callback<E>>,
    on_close: Option<Callback<E>>,
}

impl<E> Notification<E> {
    /// Creates a notification with no callbacks and a single acknowledge
    /// button.
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            confirm_text: None,
            cancel_text: None,
            anchor: None,
            on_confirm: None,
            on_close: None,
        }
    }

    /// Creates an [`NotificationKind::Info`] notification.
    #[must_use]
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    /// Creates a [`NotificationKind::Success`] notification.
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    /// Creates a [`NotificationKind::Warning`] notification.
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    /// Creates a [`NotificationKind::Danger`] notification.
    #[must_use]
    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Danger, title, message)
    }

    /// Sets the callback run when the notification is confirmed.
    #[must_use]
    pub fn on_confirm(mut self, callback: impl FnOnce() -> Result<(), E> + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    /// Sets the callback run when the notification is dismissed.
    #[must_use]
    pub fn on_close(mut self, callback: impl FnOnce() -> Result<(), E> + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Sets the label of the confirm button.
    #[must_use]
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = Some(text.into());
        self
    }

    /// Adds a cancel button with the given label.
    ///
    /// Cancelling closes the notification without running `on_confirm`.
    #[must_use]
    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    /// Attaches the notification to a screen coordinate.
    #[must_use]
    pub const fn anchored_at(mut self, x: i32, y: i32) -> Self {
        self.anchor = Some(Anchor { x, y });
        self
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the anchor, if any.
    #[must_use]
    pub const fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Returns the buttons to render.
    ///
    /// Without a cancel label the notification is a plain acknowledgement.
    #[must_use]
    pub fn buttons(&self) -> Buttons<'_> {
        match &self.cancel_text {
            Some(cancel) => Buttons::ConfirmCancel {
                confirm: self.confirm_text.as_deref().unwrap_or("Confirm"),
                cancel,
            },
            None => Buttons::Acknowledge {
                label: self.confirm_text.as_deref().unwrap_or("OK"),
            },
        }
    }
}

impl<E> fmt::Debug for Notification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("message", &self.message)
            .field("confirm_text", &self.confirm_text)
            .field("cancel_text", &self.cancel_text)
            .field("anchor", &self.anchor)
            .field("on_confirm", &self.on_confirm.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// The operations a page needs from a notification surface.
pub trait Notifier {
    /// The error type returned by callbacks.
    type Error;

    /// Shows `notification`, replacing any notification already visible.
    fn show(&mut self, notification: Notification<Self::Error>);

    /// Closes the visible notification and runs its `on_confirm` callback.
    ///
    /// Does nothing if no notification is visible.
    ///
    /// # Errors
    ///
    /// Returns whatever the callback returns. The notification is already
    /// closed when the callback runs.
    fn confirm(&mut self) -> Result<(), Self::Error>;

    /// Closes the visible notification and runs its `on_close` callback.
    ///
    /// Does nothing if no notification is visible.
    ///
    /// # Errors
    ///
    /// Returns whatever the callback returns. The notification is already
    /// closed when the callback runs.
    fn dismiss(&mut self) -> Result<(), Self::Error>;

    /// Closes the visible notification without running any callback.
    fn hide(&mut self);

    /// Returns the visible notification, if any.
    fn current(&self) -> Option<&Notification<Self::Error>>;

    /// Returns `true` if a notification is visible.
    fn is_visible(&self) -> bool {
        self.current().is_some()
    }

    /// Routes a user response to [`Notifier::confirm`] or
    /// [`Notifier::dismiss`].
    ///
    /// # Errors
    ///
    /// Returns whatever the invoked callback returns.
    fn respond(&mut self, response: Response) -> Result<(), Self::Error> {
        match response {
            Response::Confirm => self.confirm(),
            Response::Cancel | Response::Close | Response::Backdrop => self.dismiss(),
        }
    }
}

/// The notification state of one page.
pub enum State<E> {
    /// Nothing is shown.
    Hidden,
    /// A notification is shown.
    Visible(Notification<E>),
}

impl<E> fmt::Debug for State<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("Hidden"),
            Self::Visible(notification) => f.debug_tuple("Visible").field(notification).finish(),
        }
    }
}

/// The default [`Notifier`]: one visible notification at a time, last write
/// wins, no queue and no auto-dismiss.
pub struct Controller<E = anyhow::Error> {
    state: State<E>,
    anchor_offset: i32,
}

impl<E> Default for Controller<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Controller<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("anchor_offset", &self.anchor_offset)
            .finish()
    }
}

impl<E> Controller<E> {
    /// Creates a hidden controller using the default anchor offset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a hidden controller using the anchor offset from `config`.
    #[must_use]
    pub const fn with_config(config: &Config) -> Self {
        Self {
            state: State::Hidden,
            anchor_offset: config.anchor_offset,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &State<E> {
        &self.state
    }

    /// Returns where the visible notification should be drawn, or `None` if
    /// nothing is visible.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        let State::Visible(notification) = &self.state else {
            return None;
        };
        Some(notification.anchor.map_or(Placement::Centered, |anchor| {
            Placement::Anchored {
                x: anchor.x,
                y: anchor.y.saturating_sub(self.anchor_offset),
            }
        }))
    }

    fn take(&mut self) -> Option<Notification<E>> {
        match std::mem::replace(&mut self.state, State::Hidden) {
            State::Hidden => None,
            State::Visible(notification) => Some(notification),
        }
    }
}

impl<E> Notifier for Controller<E> {
    type Error = E;

    fn show(&mut self, notification: Notification<E>) {
        if let State::Visible(previous) = &self.state {
            tracing::debug!("Replacing notification '{}'", previous.title);
        }
        tracing::debug!(
            "Showing {} notification '{}'",
            notification.kind,
            notification.title
        );
        self.state = State::Visible(notification);
    }

    fn confirm(&mut self) -> Result<(), E> {
        let Some(notification) = self.take() else {
            tracing::trace!("Ignoring confirm: no notification visible");
            return Ok(());
        };
        tracing::debug!("Confirmed notification '{}'", notification.title);
        notification.on_confirm.map_or(Ok(()), |callback| callback())
    }

    fn dismiss(&mut self) -> Result<(), E> {
        let Some(notification) = self.take() else {
            tracing::trace!("Ignoring dismiss: no notification visible");
            return Ok(());
        };
        tracing::debug!("Dismissed notification '{}'", notification.title);
        notification.on_close.map_or(Ok(()), |callback| callback())
    }

    fn hide(&mut self) {
        if let Some(notification) = self.take() {
            tracing::debug!("Hid notification '{}'", notification.title);
        }
    }

    fn current(&self) -> Option<&Notification<E>> {
        match &self.state {
            State::Hidden => None,
            State::Visible(notification) => Some(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() -> anyhow::Result<()> + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || {
            handle.set(handle.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn confirm_runs_callback_once_then_hides() {
        let mut controller = Controller::new();
        let (confirmed, on_confirm) = counter();
        let (closed, on_close) = counter();

        controller.show(
            Notification::danger("Delete?", "Are you sure?")
                .on_confirm(on_confirm)
                .on_close(on_close),
        );
        assert!(controller.is_visible());

        controller.confirm().unwrap();
        assert_eq!(confirmed.get(), 1);
        assert!(!controller.is_visible());

        controller.dismiss().unwrap();
        controller.confirm().unwrap();
        assert_eq!(confirmed.get(), 1);
        assert_eq!(closed.get(), 0);
    }

    #[test]
    fn dismiss_runs_close_callback_only() {
        let mut controller = Controller::new();
        let (confirmed, on_confirm) = counter();
        let (closed, on_close) = counter();

        controller.show(
            Notification::warning("Reject request?", "This cannot be undone")
                .cancel_text("Keep")
                .on_confirm(on_confirm)
                .on_close(on_close),
        );
        controller.respond(Response::Cancel).unwrap();

        assert_eq!(confirmed.get(), 0);
        assert_eq!(closed.get(), 1);
        assert!(matches!(controller.state(), State::Hidden));
    }

    #[test]
    fn second_show_overwrites_first() {
        let mut controller = Controller::new();
        let (first, on_first) = counter();
        let (second, on_second) = counter();

        controller.show(Notification::info("First", "one").on_confirm(on_first));
        controller.show(Notification::success("Second", "two").on_confirm(on_second));

        let current = controller.current().unwrap();
        assert_eq!(current.title(), "Second");
        assert_eq!(current.kind(), NotificationKind::Success);

        controller.confirm().unwrap();
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert!(!controller.is_visible());
    }

    #[test]
    fn callback_error_propagates_and_state_is_hidden() {
        let mut controller: Controller = Controller::new();
        controller.show(
            Notification::danger("Delete user?", "Permanently")
                .on_confirm(|| Err(anyhow::anyhow!("server unavailable"))),
        );

        let error = controller.confirm().unwrap_err();
        assert_eq!(error.to_string(), "server unavailable");
        assert!(!controller.is_visible());
    }

    #[test]
    fn hide_skips_callbacks() {
        let mut controller = Controller::new();
        let (closed, on_close) = counter();
        controller.show(Notification::info("Saved", "Profile updated").on_close(on_close));

        controller.hide();

        assert!(!controller.is_visible());
        assert_eq!(closed.get(), 0);
    }

    #[test]
    fn placement_is_centred_without_anchor() {
        let mut controller: Controller = Controller::new();
        assert_eq!(controller.placement(), None);

        controller.show(Notification::info("Hi", "there"));
        assert_eq!(controller.placement(), Some(Placement::Centered));
    }

    #[test]
    fn anchored_placement_is_raised_by_offset() {
        let mut config = Config::default();
        config.anchor_offset = 40;
        let mut controller: Controller = Controller::with_config(&config);

        controller.show(
            Notification::warning("Respond?", "Accept this request").anchored_at(300, 500),
        );
        assert_eq!(
            controller.placement(),
            Some(Placement::Anchored { x: 300, y: 460 })
        );
    }

    #[test]
    fn buttons_follow_cancel_text() {
        let acknowledge: Notification = Notification::success("Done", "Request created");
        assert_eq!(acknowledge.buttons(), Buttons::Acknowledge { label: "OK" });

        let confirm: Notification = Notification::danger("Delete?", "Sure?")
            .confirm_text("Delete")
            .cancel_text("Cancel");
        assert!(confirm.kind().is_destructive());
        assert_eq!(
            confirm.buttons(),
            Buttons::ConfirmCancel {
                confirm: "Delete",
                cancel: "Cancel"
            }
        );
    }

    #[test]
    fn acknowledge_confirms() {
        let mut controller = Controller::new();
        let (acknowledged, on_confirm) = counter();
        controller.show(Notification::success("Saved", "All good").on_confirm(on_confirm));

        controller.respond(Response::Confirm).unwrap();

        assert_eq!(acknowledged.get(), 1);
    }
}
