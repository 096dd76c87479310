//! Stylesheet loading.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use futures::future::{try_join_all, FutureExt, Shared};

use super::state::SwitchState;
use crate::catalog::THEMES;
use crate::config::ThemeConfig;
use crate::document::{AttachFuture, Document, StylesheetLink};
use crate::error::ThemeError;
use crate::events::Notifier;
use crate::store::KeyValueStore;

type SharedLoad = Shared<AttachFuture>;

/// Loads, switches and reads CDN-hosted themes.
///
/// # Example
///
/// ```rust
/// use element_themes::document::{MemoryDocument, StaticFetcher};
/// use element_themes::{ColorLevel, ColorRamp, MemoryStore, ThemeConfig, ThemeEvents, ThemeId, ThemeLoader};
/// use futures::executor::block_on;
///
/// let fetcher = StaticFetcher::new()
///     .with_sheet("bayer.theme.css", ":root { --primary-400: #10384f }");
/// let loader = ThemeLoader::new(
///     ThemeConfig::default(),
///     MemoryDocument::new(fetcher),
///     MemoryStore::new(),
///     ThemeEvents::new(),
/// );
///
/// let active = block_on(loader.initialize(ThemeId::BAYER)).unwrap();
/// assert_eq!(active.as_str(), "bayer");
/// assert_eq!(
///     loader.computed_color(ColorRamp::Primary, ColorLevel::L400).as_deref(),
///     Some("#10384f")
/// );
/// ```
pub struct ThemeLoader<D, S, N> {
    pub(super) config: ThemeConfig,
    pub(super) document: D,
    pub(super) store: S,
    pub(super) notifier: N,
    /// Loads started by this loader, keyed by theme. Settled entries keep
    /// their outcome for the rest of the session.
    loads: RefCell<BTreeMap<String, SharedLoad>>,
    /// Every theme this loader ever attached, including forgotten ones.
    started: RefCell<BTreeSet<String>>,
    pub(super) state: RefCell<SwitchState>,
}

impl<D, S, N> ThemeLoader<D, S, N>
where
    D: Document,
    S: KeyValueStore,
    N: Notifier,
{
    pub fn new(config: ThemeConfig, document: D, store: S, notifier: N) -> Self {
        Self {
            config,
            document,
            store,
            notifier,
            loads: RefCell::new(BTreeMap::new()),
            started: RefCell::new(BTreeSet::new()),
            state: RefCell::new(SwitchState::default()),
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The theme catalog.
    pub fn available_themes(&self) -> &'static [&'static str] {
        THEMES
    }

    /// Themes whose stylesheet this loader has attached, sorted.
    ///
    /// Includes loads that are still pending or have failed.
    pub fn attached_themes(&self) -> Vec<String> {
        self.loads.borrow().keys().cloned().collect()
    }

    /// Ensures `theme`'s stylesheet is attached and loaded.
    ///
    /// The name is not checked against the catalog, so any published
    /// stylesheet can be preloaded. The first call attaches a link to
    /// `<cdn_base>/<theme>.theme.css`; later and concurrent calls share that
    /// load's outcome, so a theme is attached at most once per loader. A
    /// failed load is not retried unless [`forget`](Self::forget) is called,
    /// and its link stays attached.
    ///
    /// If the document already holds a link with the theme's id that this
    /// loader did not create, the call resolves immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Load`] if the stylesheet fails to load.
    pub async fn ensure_stylesheet_loaded(&self, theme: &str) -> Result<(), ThemeError> {
        match self.start_load(theme) {
            Some(load) => settle(theme, load).await,
            None => Ok(()),
        }
    }

    /// Loads several themes concurrently.
    ///
    /// Every link is attached before this first awaits. Resolves once every
    /// load succeeds; fails with the first error observed. Loads still in
    /// flight at that point keep going, and stylesheets that already loaded
    /// stay attached.
    pub async fn preload<I, T>(&self, themes: I) -> Result<(), ThemeError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let loads: Vec<(String, SharedLoad)> = themes
            .into_iter()
            .filter_map(|theme| {
                let theme = theme.as_ref();
                self.start_load(theme)
                    .map(|load| (theme.to_string(), load))
            })
            .collect();
        tracing::debug!(count = loads.len(), "preloading themes");

        try_join_all(
            loads
                .into_iter()
                .map(|(theme, load)| async move { settle(&theme, load).await }),
        )
        .await?;
        Ok(())
    }

    /// Drops the cached load for `theme` so the next call fetches again.
    ///
    /// The link element from the earlier attempt stays in the document, so
    /// the retry attaches a second one. Returns false when nothing was cached.
    pub fn forget(&self, theme: &str) -> bool {
        let removed = self.loads.borrow_mut().remove(theme).is_some();
        if removed {
            tracing::debug!(theme, "forgetting cached stylesheet load");
        }
        removed
    }

    /// Attaches `theme`'s link unless already done and returns the load to
    /// await, or `None` when a foreign link already carries the theme's id.
    fn start_load(&self, theme: &str) -> Option<SharedLoad> {
        let mut loads = self.loads.borrow_mut();
        if let Some(load) = loads.get(theme) {
            return Some(load.clone());
        }

        let id = self.config.link_id(theme);
        // A forgotten load leaves its own link behind; only foreign links
        // count as already attached.
        if self.document.is_attached(&id) && !self.forgotten(theme) {
            tracing::debug!(theme, id = %id, "stylesheet already attached");
            return None;
        }

        let href = self.config.stylesheet_url(theme);
        tracing::debug!(theme, href = %href, "attaching stylesheet");
        let load = self.document.attach(StylesheetLink { id, href }).shared();
        loads.insert(theme.to_string(), load.clone());
        self.started.borrow_mut().insert(theme.to_string());
        Some(load)
    }

    fn forgotten(&self, theme: &str) -> bool {
        self.started.borrow().contains(theme)
    }
}

async fn settle(theme: &str, load: SharedLoad) -> Result<(), ThemeError> {
    load.await.map_err(|err| {
        tracing::warn!(theme, href = %err.href, reason = %err.reason, "theme stylesheet failed to load");
        ThemeError::Load {
            theme: theme.to_string(),
            reason: err.reason,
        }
    })
}
