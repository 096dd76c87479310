//! Theme change notifications.
//!
//! A successful switch announces itself through a [`Notifier`]. The default
//! notifier, [`ThemeEvents`], is a small publish/subscribe bus: every
//! subscriber owns a channel receiver, and an event is queued on every live
//! receiver before `notify` returns. Subscribers that dropped their receiver
//! are pruned on the next notification.
//!
//! ```rust
//! use element_themes::{Notifier, ThemeChanged, ThemeEvents, ThemeId};
//!
//! let events = ThemeEvents::new();
//! let rx = events.subscribe();
//!
//! let theme = ThemeId::parse("velocity").unwrap();
//! events.notify(&ThemeChanged { theme });
//! assert_eq!(rx.try_recv().unwrap().theme, theme);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use flume::{Receiver, Sender};
use serde::Serialize;

use crate::catalog::ThemeId;

/// Payload announcing the newly active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeChanged {
    pub theme: ThemeId,
}

/// Receives theme change announcements.
///
/// `notify` is called synchronously, after the new theme's stylesheet is
/// attached and loaded and its marker is active.
pub trait Notifier {
    fn notify(&self, event: &ThemeChanged);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, event: &ThemeChanged) {
        (**self).notify(event)
    }
}

/// Publish/subscribe bus for [`ThemeChanged`] events. Clones share subscribers.
#[derive(Debug, Clone, Default)]
pub struct ThemeEvents {
    subscribers: Rc<RefCell<Vec<Sender<ThemeChanged>>>>,
}

impl ThemeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    ///
    /// Only events emitted after this call are delivered.
    pub fn subscribe(&self) -> Receiver<ThemeChanged> {
        let (tx, rx) = flume::unbounded();
        self.subscribers.borrow_mut().push(tx);
        rx
    }

    /// Number of subscribers still registered.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl Notifier for ThemeEvents {
    fn notify(&self, event: &ThemeChanged) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|tx| tx.send(*event).is_ok());
        tracing::trace!(
            theme = %event.theme,
            subscribers = subscribers.len(),
            "theme change delivered"
        );
    }
}
