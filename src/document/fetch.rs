//! Stylesheet sources for the headless document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::{self, FutureExt, LocalBoxFuture};

/// Future resolving to a stylesheet's text or a failure reason.
pub type FetchFuture = LocalBoxFuture<'static, Result<String, String>>;

/// Retrieves stylesheet text by URL.
///
/// This plays the role the browser's network stack plays for a real page.
pub trait StylesheetFetcher {
    fn fetch(&self, href: &str) -> FetchFuture;
}

/// Serves stylesheets from memory.
///
/// Entries are matched by full URL first, then by file name (the last path
/// segment), so `"bayer.theme.css"` serves any CDN base. Unknown URLs fail
/// with a "404 Not Found" reason.
///
/// # Example
///
/// ```rust
/// use element_themes::document::StaticFetcher;
///
/// let fetcher = StaticFetcher::new()
///     .with_sheet("bayer.theme.css", ":root { --primary-400: #10384f }")
///     .with_failure("asgrow.theme.css", "network error");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    entries: HashMap<String, Result<String, String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `css` for `key` (a full URL or a file name).
    pub fn with_sheet(mut self, key: impl Into<String>, css: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Ok(css.into()));
        self
    }

    /// Fails every fetch of `key` with `reason`.
    pub fn with_failure(mut self, key: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries.insert(key.into(), Err(reason.into()));
        self
    }

    fn lookup(&self, href: &str) -> Result<String, String> {
        self.entries
            .get(href)
            .or_else(|| self.entries.get(file_name(href)))
            .cloned()
            .unwrap_or_else(|| Err("404 Not Found".to_string()))
    }
}

impl StylesheetFetcher for StaticFetcher {
    fn fetch(&self, href: &str) -> FetchFuture {
        future::ready(self.lookup(href)).boxed_local()
    }
}

/// Serves stylesheets from a local mirror of the CDN directory.
///
/// The file name of the requested URL is resolved against `root`, so
/// `https://cdn/element-themes/bayer.theme.css` reads `<root>/bayer.theme.css`.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StylesheetFetcher for DirFetcher {
    fn fetch(&self, href: &str) -> FetchFuture {
        let path = self.root.join(file_name(href));
        let result = std::fs::read_to_string(&path)
            .map_err(|e| format!("{}: {}", path.display(), e));
        future::ready(result).boxed_local()
    }
}

impl<T: StylesheetFetcher + ?Sized> StylesheetFetcher for std::rc::Rc<T> {
    fn fetch(&self, href: &str) -> FetchFuture {
        (**self).fetch(href)
    }
}

/// Last path segment of a URL, ignoring any query or fragment.
fn file_name(href: &str) -> &str {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.rsplit('/').next().unwrap_or(path)
}
