//! Document capabilities the loader drives.
//!
//! The loader never touches a DOM directly. It talks to a [`Document`], which
//! is a [`StylesheetAttacher`] that also owns the root element's class
//! markers and can report computed custom property values.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryDocument`]: headless, fetches stylesheets through a
//!   [`StylesheetFetcher`] and resolves custom properties itself
//! - `BrowserDocument` (feature `web`): the real page via `web-sys`

mod css;
mod fetch;
mod memory;

use futures::future::LocalBoxFuture;

pub use css::{parse_custom_properties, CustomPropertyRule};
pub use fetch::{DirFetcher, FetchFuture, StaticFetcher, StylesheetFetcher};
pub use memory::{MemoryDocument, SheetStatus};

/// A stylesheet link to attach to the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetLink {
    /// Unique element id, used to detect an existing attachment.
    pub id: String,
    /// URL of the stylesheet.
    pub href: String,
}

/// Error reported when an attached stylesheet fails to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stylesheet {href} failed to load: {reason}")]
pub struct StylesheetError {
    pub href: String,
    pub reason: String,
}

/// Error reported when the document cannot carry a theme marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot set theme marker {class}: {reason}")]
pub struct MarkerError {
    pub class: String,
    pub reason: String,
}

/// Future settling when an attached stylesheet finishes loading.
pub type AttachFuture = LocalBoxFuture<'static, Result<(), StylesheetError>>;

/// Attaches stylesheet resources to a document.
pub trait StylesheetAttacher {
    /// Returns true if an element with this id is already attached.
    fn is_attached(&self, id: &str) -> bool;

    /// Attaches `link` and returns a future for its load outcome.
    ///
    /// The element must be attached before this returns, so that a second
    /// call with the same id observes it through [`is_attached`](Self::is_attached).
    /// A link whose load fails stays attached.
    fn attach(&self, link: StylesheetLink) -> AttachFuture;
}

/// The document-level state a theme switch touches.
pub trait Document: StylesheetAttacher {
    /// Checks that `class` could be set right now.
    ///
    /// Called before a switch persists anything, so a document that cannot
    /// take markers fails the switch with nothing changed.
    fn check_marker(&self, _class: &str) -> Result<(), MarkerError> {
        Ok(())
    }

    /// Adds or removes a class marker on the root element.
    fn set_marker(&self, class: &str, active: bool) -> Result<(), MarkerError>;

    /// Returns true if the root element carries `class`.
    fn has_marker(&self, class: &str) -> bool;

    /// Returns the computed value of a custom property on the root element.
    ///
    /// The value is returned as the document reports it, untrimmed.
    fn computed_property(&self, name: &str) -> Option<String>;
}

impl<T: StylesheetAttacher + ?Sized> StylesheetAttacher for &T {
    fn is_attached(&self, id: &str) -> bool {
        (**self).is_attached(id)
    }

    fn attach(&self, link: StylesheetLink) -> AttachFuture {
        (**self).attach(link)
    }
}

impl<T: Document + ?Sized> Document for &T {
    fn check_marker(&self, class: &str) -> Result<(), MarkerError> {
        (**self).check_marker(class)
    }

    fn set_marker(&self, class: &str, active: bool) -> Result<(), MarkerError> {
        (**self).set_marker(class, active)
    }

    fn has_marker(&self, class: &str) -> bool {
        (**self).has_marker(class)
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        (**self).computed_property(name)
    }
}
