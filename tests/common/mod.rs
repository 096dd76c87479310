//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::FutureExt;

use element_themes::document::{FetchFuture, MemoryDocument, StylesheetFetcher};
use element_themes::{MemoryStore, ThemeConfig, ThemeEvents, ThemeLoader};

pub const CDN: &str = "https://cdn.test/element-themes";

pub type TestLoader = ThemeLoader<MemoryDocument, MemoryStore, ThemeEvents>;

#[derive(Default)]
struct Gates {
    pending: HashMap<String, Vec<oneshot::Sender<Result<String, String>>>>,
    requests: Vec<String>,
}

/// A fetcher whose responses are released by the test.
///
/// Every fetch stays pending until [`succeed`](Self::succeed) or
/// [`fail`](Self::fail) is called for the theme it requested. Clones share
/// their gates.
#[derive(Clone, Default)]
pub struct GatedFetcher {
    gates: Rc<RefCell<Gates>>,
}

impl GatedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Theme names requested so far, in order, one entry per fetch.
    pub fn requests(&self) -> Vec<String> {
        self.gates.borrow().requests.clone()
    }

    /// Number of fetches for `theme` still waiting.
    pub fn waiting(&self, theme: &str) -> usize {
        self.gates
            .borrow()
            .pending
            .get(theme)
            .map_or(0, |senders| senders.len())
    }

    pub fn succeed(&self, theme: &str, css: &str) {
        self.release(theme, Ok(css.to_string()));
    }

    pub fn fail(&self, theme: &str, reason: &str) {
        self.release(theme, Err(reason.to_string()));
    }

    fn release(&self, theme: &str, outcome: Result<String, String>) {
        let senders = self
            .gates
            .borrow_mut()
            .pending
            .remove(theme)
            .unwrap_or_default();
        assert!(!senders.is_empty(), "no pending fetch for {theme}");
        for tx in senders {
            let _ = tx.send(outcome.clone());
        }
    }
}

impl StylesheetFetcher for GatedFetcher {
    fn fetch(&self, href: &str) -> FetchFuture {
        let theme = theme_of(href);
        let (tx, rx) = oneshot::channel();
        {
            let mut gates = self.gates.borrow_mut();
            gates.requests.push(theme.clone());
            gates.pending.entry(theme).or_default().push(tx);
        }
        rx.map(|outcome| outcome.unwrap_or_else(|_| Err("gate dropped".to_string())))
            .boxed_local()
    }
}

fn theme_of(href: &str) -> String {
    let file = href.rsplit('/').next().unwrap_or(href);
    file.trim_end_matches(".theme.css").to_string()
}

/// A stylesheet setting `--primary-400` under the theme's marker.
pub fn sheet(theme: &str, primary_400: &str) -> String {
    format!(".theme-{theme} {{ --primary-400: {primary_400}; }}")
}

pub fn loader(fetcher: impl StylesheetFetcher + 'static, store: MemoryStore) -> TestLoader {
    ThemeLoader::new(
        ThemeConfig::with_cdn_base(CDN),
        MemoryDocument::new(fetcher),
        store,
        ThemeEvents::new(),
    )
}
