//! Browser capabilities backed by `web-sys`.
//!
//! - [`BrowserDocument`]: link elements in `<head>`, class markers on
//!   `<body>`, computed styles of `<html>`
//! - [`LocalStorageStore`]: `window.localStorage`
//! - [`DomEventNotifier`]: a `CustomEvent` on `window` for listeners outside Rust
//!
//! ```rust,ignore
//! use element_themes::web::{BrowserDocument, DomEventNotifier, LocalStorageStore};
//! use element_themes::{ThemeConfig, ThemeLoader};
//!
//! let config = ThemeConfig::default();
//! let loader = ThemeLoader::new(
//!     config.clone(),
//!     BrowserDocument::current().expect("running in a page"),
//!     LocalStorageStore::current().expect("storage available"),
//!     DomEventNotifier::current(&config.event_name).expect("running in a page"),
//! );
//! wasm_bindgen_futures::spawn_local(async move {
//!     let _ = loader.initialize_default().await;
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{self, FutureExt};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlLinkElement, Storage, Window};

use crate::document::{
    AttachFuture, Document, MarkerError, StylesheetAttacher, StylesheetError, StylesheetLink,
};
use crate::error::StoreError;
use crate::events::{Notifier, ThemeChanged};
use crate::store::KeyValueStore;

type LoadSender = Rc<RefCell<Option<oneshot::Sender<Result<(), StylesheetError>>>>>;

/// The current page's document.
pub struct BrowserDocument {
    window: Window,
    document: web_sys::Document,
}

impl BrowserDocument {
    /// Returns `None` outside a page context (workers, non-browser hosts).
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn create_link(&self, link: &StylesheetLink) -> Result<HtmlLinkElement, JsValue> {
        let element = self
            .document
            .create_element("link")?
            .dyn_into::<HtmlLinkElement>()
            .map_err(JsValue::from)?;
        element.set_id(&link.id);
        element.set_rel("stylesheet");
        element.set_href(&link.href);
        Ok(element)
    }
}

fn settle(sender: &LoadSender, outcome: Result<(), StylesheetError>) {
    if let Some(tx) = sender.borrow_mut().take() {
        let _ = tx.send(outcome);
    }
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl StylesheetAttacher for BrowserDocument {
    fn is_attached(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn attach(&self, link: StylesheetLink) -> AttachFuture {
        let href = link.href.clone();
        let fail = |reason: String| {
            future::ready(Err(StylesheetError {
                href: href.clone(),
                reason,
            }))
            .boxed_local()
        };

        let element = match self.create_link(&link) {
            Ok(element) => element,
            Err(err) => return fail(js_reason(&err)),
        };
        let Some(head) = self.document.head() else {
            return fail("document has no <head>".to_string());
        };

        let (tx, rx) = oneshot::channel();
        let sender: LoadSender = Rc::new(RefCell::new(Some(tx)));

        let on_load = {
            let sender = Rc::clone(&sender);
            Closure::once_into_js(move || settle(&sender, Ok(())))
        };
        let on_error = {
            let sender = Rc::clone(&sender);
            let href = href.clone();
            Closure::once_into_js(move || {
                settle(
                    &sender,
                    Err(StylesheetError {
                        href,
                        reason: "stylesheet load error".to_string(),
                    }),
                )
            })
        };
        element.set_onload(Some(on_load.unchecked_ref()));
        element.set_onerror(Some(on_error.unchecked_ref()));

        if let Err(err) = head.append_child(&element) {
            return fail(js_reason(&err));
        }

        async move {
            rx.await.unwrap_or_else(|_| {
                Err(StylesheetError {
                    href,
                    reason: "load listener dropped".to_string(),
                })
            })
        }
        .boxed_local()
    }
}

impl BrowserDocument {
    fn marker_host(&self, class: &str) -> Result<web_sys::HtmlElement, MarkerError> {
        self.document.body().ok_or_else(|| MarkerError {
            class: class.to_string(),
            reason: "document has no <body>".to_string(),
        })
    }
}

impl Document for BrowserDocument {
    fn check_marker(&self, class: &str) -> Result<(), MarkerError> {
        self.marker_host(class).map(|_| ())
    }

    fn set_marker(&self, class: &str, active: bool) -> Result<(), MarkerError> {
        let classes = self.marker_host(class)?.class_list();
        let result = if active {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        result.map_err(|err| MarkerError {
            class: class.to_string(),
            reason: js_reason(&err),
        })
    }

    fn has_marker(&self, class: &str) -> bool {
        self.document
            .body()
            .map(|body| body.class_list().contains(class))
            .unwrap_or(false)
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        let root = self.document.document_element()?;
        let style = self.window.get_computed_style(&root).ok()??;
        style.get_property_value(name).ok()
    }
}

/// `window.localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Returns `None` outside a page or when storage is disabled.
    pub fn current() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StoreError::Write {
                key: key.to_string(),
                reason: js_reason(&err),
            })
    }
}

/// Dispatches theme changes as a DOM `CustomEvent` on `window`.
///
/// The event's `detail` is `{ theme: "<name>" }`.
pub struct DomEventNotifier {
    window: Window,
    event_name: String,
}

impl DomEventNotifier {
    pub fn current(event_name: impl Into<String>) -> Option<Self> {
        Some(Self {
            window: web_sys::window()?,
            event_name: event_name.into(),
        })
    }

    fn dispatch(&self, event: &ThemeChanged) -> Result<(), JsValue> {
        let detail = js_sys::Object::new();
        js_sys::Reflect::set(
            &detail,
            &JsValue::from_str("theme"),
            &JsValue::from_str(event.theme.as_str()),
        )?;
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        let dom_event = web_sys::CustomEvent::new_with_event_init_dict(&self.event_name, &init)?;
        self.window.dispatch_event(&dom_event)?;
        Ok(())
    }
}

impl Notifier for DomEventNotifier {
    fn notify(&self, event: &ThemeChanged) {
        if let Err(err) = self.dispatch(event) {
            tracing::warn!(
                event = %self.event_name,
                reason = %js_reason(&err),
                "could not dispatch theme change event"
            );
        }
    }
}

/// Broadcasts to two notifiers, e.g. an in-process bus and the DOM.
pub struct Both<A, B>(pub A, pub B);

impl<A: Notifier, B: Notifier> Notifier for Both<A, B> {
    fn notify(&self, event: &ThemeChanged) {
        self.0.notify(event);
        self.1.notify(event);
    }
}
