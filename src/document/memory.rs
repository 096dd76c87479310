//! Headless in-memory document.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use futures::future::{FutureExt, Shared};

use super::css::{parse_custom_properties, CustomPropertyRule};
use super::fetch::{FetchFuture, StylesheetFetcher};
use super::{
    AttachFuture, Document, MarkerError, StylesheetAttacher, StylesheetError, StylesheetLink,
};

/// Load status of an attached stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetStatus {
    Pending,
    Loaded,
    /// The fetch failed; the link stays attached.
    Failed(String),
}

type SharedFetch = Shared<FetchFuture>;

struct AttachedSheet {
    link: StylesheetLink,
    status: SheetStatus,
    rules: Vec<CustomPropertyRule>,
    /// The fetch, until its outcome has been recorded.
    fetch: Option<SharedFetch>,
}

impl AttachedSheet {
    fn record(&mut self, outcome: &Result<String, String>) {
        if self.fetch.take().is_none() {
            return;
        }
        match outcome {
            Ok(css) => {
                self.rules = parse_custom_properties(css);
                self.status = SheetStatus::Loaded;
            }
            Err(reason) => self.status = SheetStatus::Failed(reason.clone()),
        }
    }
}

#[derive(Default)]
struct DocumentState {
    sheets: Vec<AttachedSheet>,
    markers: BTreeSet<String>,
}

/// A document that lives entirely in memory.
///
/// Stylesheets are fetched through a [`StylesheetFetcher`] and parsed for
/// custom properties. [`computed_property`](Document::computed_property)
/// resolves a property the way the root element would see it:
///
/// - only loaded sheets contribute, in attachment order, later sheets winning
/// - a rule applies when one of its selectors is `:root` or `html`, or a
///   compound of class selectors (optionally prefixed by `:root`/`html`)
///   whose classes are all active markers
///
/// Specificity is not modeled. Clones share the same document.
#[derive(Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
    fetcher: Rc<dyn StylesheetFetcher>,
}

impl MemoryDocument {
    pub fn new(fetcher: impl StylesheetFetcher + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(DocumentState::default())),
            fetcher: Rc::new(fetcher),
        }
    }

    /// Records the outcome of every fetch that has finished, whether or
    /// not anyone still awaits its attach future.
    fn settle_pending(&self) {
        let pending: Vec<(usize, SharedFetch)> = self
            .state
            .borrow()
            .sheets
            .iter()
            .enumerate()
            .filter_map(|(index, sheet)| sheet.fetch.clone().map(|fetch| (index, fetch)))
            .collect();

        for (index, fetch) in pending {
            if let Some(outcome) = fetch.now_or_never() {
                self.state.borrow_mut().sheets[index].record(&outcome);
            }
        }
    }

    /// Links in attachment order.
    pub fn links(&self) -> Vec<StylesheetLink> {
        self.state
            .borrow()
            .sheets
            .iter()
            .map(|sheet| sheet.link.clone())
            .collect()
    }

    /// Number of attached links carrying `id`.
    pub fn link_count(&self, id: &str) -> usize {
        self.state
            .borrow()
            .sheets
            .iter()
            .filter(|sheet| sheet.link.id == id)
            .count()
    }

    /// Status of the most recent link carrying `id`.
    pub fn sheet_status(&self, id: &str) -> Option<SheetStatus> {
        self.settle_pending();
        self.state
            .borrow()
            .sheets
            .iter()
            .rev()
            .find(|sheet| sheet.link.id == id)
            .map(|sheet| sheet.status.clone())
    }

    /// Active root markers, sorted.
    pub fn markers(&self) -> Vec<String> {
        self.state.borrow().markers.iter().cloned().collect()
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryDocument")
            .field(
                "links",
                &state
                    .sheets
                    .iter()
                    .map(|s| (&s.link.id, &s.status))
                    .collect::<Vec<_>>(),
            )
            .field("markers", &state.markers)
            .finish()
    }
}

impl StylesheetAttacher for MemoryDocument {
    fn is_attached(&self, id: &str) -> bool {
        self.state
            .borrow()
            .sheets
            .iter()
            .any(|sheet| sheet.link.id == id)
    }

    fn attach(&self, link: StylesheetLink) -> AttachFuture {
        let fetch = self.fetcher.fetch(&link.href).shared();
        let href = link.href.clone();
        let index = {
            let mut state = self.state.borrow_mut();
            state.sheets.push(AttachedSheet {
                link,
                status: SheetStatus::Pending,
                rules: Vec::new(),
                fetch: Some(fetch.clone()),
            });
            state.sheets.len() - 1
        };

        let state = Rc::clone(&self.state);
        async move {
            let outcome = fetch.await;
            state.borrow_mut().sheets[index].record(&outcome);
            outcome.map(|_| ()).map_err(|reason| StylesheetError { href, reason })
        }
        .boxed_local()
    }
}

impl Document for MemoryDocument {
    fn set_marker(&self, class: &str, active: bool) -> Result<(), MarkerError> {
        let mut state = self.state.borrow_mut();
        if active {
            state.markers.insert(class.to_string());
        } else {
            state.markers.remove(class);
        }
        Ok(())
    }

    fn has_marker(&self, class: &str) -> bool {
        self.state.borrow().markers.contains(class)
    }

    fn computed_property(&self, name: &str) -> Option<String> {
        self.settle_pending();
        let state = self.state.borrow();
        state
            .sheets
            .iter()
            .filter(|sheet| sheet.status == SheetStatus::Loaded)
            .flat_map(|sheet| sheet.rules.iter())
            .filter(|rule| {
                rule.selectors
                    .iter()
                    .any(|selector| selector_matches(selector, &state.markers))
            })
            .filter_map(|rule| rule.get(name))
            .last()
            .map(str::to_string)
    }
}

/// Returns true if `selector` targets the root element given its markers.
fn selector_matches(selector: &str, markers: &BTreeSet<String>) -> bool {
    let (anchored, classes) = match selector
        .strip_prefix(":root")
        .or_else(|| selector.strip_prefix("html"))
    {
        Some(rest) => (true, rest),
        None => (false, selector),
    };

    if classes.is_empty() {
        return anchored;
    }
    let Some(classes) = classes.strip_prefix('.') else {
        return false;
    };
    classes.split('.').all(|class| {
        !class.is_empty()
            && class
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
            && markers.contains(class)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StaticFetcher;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    fn link(theme: &str) -> StylesheetLink {
        StylesheetLink {
            id: format!("theme-{}", theme),
            href: format!("https://cdn.test/{}.theme.css", theme),
        }
    }

    fn markers(classes: &[&str]) -> BTreeSet<String> {
        classes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_selector_matches() {
        let active = markers(&["theme-bayer", "dense"]);
        assert!(selector_matches(":root", &active));
        assert!(selector_matches("html", &active));
        assert!(selector_matches(".theme-bayer", &active));
        assert!(selector_matches(":root.theme-bayer", &active));
        assert!(selector_matches("html.theme-bayer.dense", &active));

        assert!(!selector_matches(".theme-asgrow", &active));
        assert!(!selector_matches(".theme-bayer.theme-asgrow", &active));
        assert!(!selector_matches("body", &active));
        assert!(!selector_matches(".theme-bayer .button", &active));
        assert!(!selector_matches(":root:hover", &active));
        assert!(!selector_matches("htmlx", &active));
        assert!(!selector_matches(".", &active));
    }

    type Gate = oneshot::Sender<Result<String, String>>;

    /// Serves one stylesheet once the test releases it.
    struct GatedFetch(RefCell<Option<oneshot::Receiver<Result<String, String>>>>);

    fn gated() -> (GatedFetch, Gate) {
        let (tx, rx) = oneshot::channel();
        (GatedFetch(RefCell::new(Some(rx))), tx)
    }

    impl StylesheetFetcher for GatedFetch {
        fn fetch(&self, _href: &str) -> FetchFuture {
            let rx = self.0.borrow_mut().take();
            async move {
                match rx {
                    Some(rx) => rx.await.unwrap_or_else(|_| Err("gate dropped".to_string())),
                    None => Err("fetched twice".to_string()),
                }
            }
            .boxed_local()
        }
    }

    #[test]
    fn test_attach_is_visible_before_load_settles() {
        let (fetcher, gate) = gated();
        let doc = MemoryDocument::new(fetcher);
        let pending = doc.attach(link("bayer"));

        assert!(doc.is_attached("theme-bayer"));
        assert_eq!(doc.sheet_status("theme-bayer"), Some(SheetStatus::Pending));

        gate.send(Ok(String::new())).unwrap();
        block_on(pending).unwrap();
        assert_eq!(doc.sheet_status("theme-bayer"), Some(SheetStatus::Loaded));
    }

    #[test]
    fn test_unawaited_attach_still_settles() {
        let (fetcher, gate) = gated();
        let doc = MemoryDocument::new(fetcher);
        drop(doc.attach(link("bayer")));
        assert_eq!(doc.sheet_status("theme-bayer"), Some(SheetStatus::Pending));
        assert_eq!(doc.computed_property("--primary-400"), None);

        gate.send(Ok(":root { --primary-400: #10384f }".to_string()))
            .unwrap();
        assert_eq!(
            doc.computed_property("--primary-400").as_deref(),
            Some("#10384f")
        );
        assert_eq!(doc.sheet_status("theme-bayer"), Some(SheetStatus::Loaded));
    }

    #[test]
    fn test_failed_sheet_stays_attached() {
        let doc = MemoryDocument::new(StaticFetcher::new());
        let err = block_on(doc.attach(link("asgrow"))).unwrap_err();

        assert_eq!(err.href, "https://cdn.test/asgrow.theme.css");
        assert_eq!(err.reason, "404 Not Found");
        assert!(doc.is_attached("theme-asgrow"));
        assert_eq!(
            doc.sheet_status("theme-asgrow"),
            Some(SheetStatus::Failed("404 Not Found".to_string()))
        );
    }

    #[test]
    fn test_computed_property_cascade() {
        let fetcher = StaticFetcher::new()
            .with_sheet("bayer.theme.css", ":root { --primary-400: #10384f; --primary-50: #eef }")
            .with_sheet("velocity.theme.css", ":root { --primary-400: #ff3162 }");
        let doc = MemoryDocument::new(fetcher);

        assert_eq!(doc.computed_property("--primary-400"), None);

        block_on(doc.attach(link("bayer"))).unwrap();
        assert_eq!(
            doc.computed_property("--primary-400").as_deref(),
            Some("#10384f")
        );

        block_on(doc.attach(link("velocity"))).unwrap();
        assert_eq!(
            doc.computed_property("--primary-400").as_deref(),
            Some("#ff3162")
        );
        assert_eq!(doc.computed_property("--primary-50").as_deref(), Some("#eef"));
    }

    #[test]
    fn test_computed_property_follows_markers() {
        let fetcher = StaticFetcher::new()
            .with_sheet("bayer.theme.css", ".theme-bayer { --danger-400: #d30f4b }")
            .with_sheet("asgrow.theme.css", ".theme-asgrow { --danger-400: #e4002b }");
        let doc = MemoryDocument::new(fetcher);
        block_on(doc.attach(link("bayer"))).unwrap();
        block_on(doc.attach(link("asgrow"))).unwrap();

        assert_eq!(doc.computed_property("--danger-400"), None);

        doc.set_marker("theme-bayer", true).unwrap();
        assert_eq!(
            doc.computed_property("--danger-400").as_deref(),
            Some("#d30f4b")
        );

        doc.set_marker("theme-bayer", false).unwrap();
        doc.set_marker("theme-asgrow", true).unwrap();
        assert_eq!(
            doc.computed_property("--danger-400").as_deref(),
            Some("#e4002b")
        );
        assert_eq!(doc.markers(), vec!["theme-asgrow"]);
    }

    #[test]
    fn test_clones_share_state() {
        let doc = MemoryDocument::new(StaticFetcher::new());
        let view = doc.clone();
        doc.set_marker("theme-hcp", true).unwrap();
        assert!(view.has_marker("theme-hcp"));
    }
}
