//! Theme switching and startup.

use super::loader::ThemeLoader;
use super::state::ThemeState;
use crate::catalog::ThemeId;
use crate::document::{Document, MarkerError};
use crate::error::ThemeError;
use crate::events::{Notifier, ThemeChanged};
use crate::store::KeyValueStore;

impl<D, S, N> ThemeLoader<D, S, N>
where
    D: Document,
    S: KeyValueStore,
    N: Notifier,
{
    /// Switches to the theme named `theme`.
    ///
    /// The name must be in the catalog. See [`switch_to`](Self::switch_to)
    /// for the switch itself.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::InvalidTheme`] for a name outside the catalog,
    /// without touching any state or fetching anything.
    pub async fn switch_theme(&self, theme: &str) -> Result<(), ThemeError> {
        let Some(theme) = ThemeId::parse(theme) else {
            tracing::warn!(theme, "rejecting theme outside the catalog");
            return Err(ThemeError::InvalidTheme(theme.to_string()));
        };
        self.switch_to(theme).await
    }

    /// Switches to `theme`.
    ///
    /// In order: loads the stylesheet, persists the choice, moves the root
    /// marker to `theme`, then notifies. Listeners therefore always find the
    /// stylesheet loaded and the marker in place.
    ///
    /// Only the most recently started switch may complete. An earlier switch
    /// whose load settles later fails with [`ThemeError::Superseded`].
    ///
    /// # Errors
    ///
    /// On [`ThemeError::Load`], [`ThemeError::Store`],
    /// [`ThemeError::Superseded`], or a [`ThemeError::Marker`] raised by the
    /// document's [`check_marker`](Document::check_marker), the document
    /// markers, the persisted value and
    /// [`current_theme`](Self::current_theme) are left as they were, and
    /// nothing is notified. A marker write failing after that check is
    /// reported as [`ThemeError::Marker`] without notifying, but the choice
    /// is already persisted.
    pub async fn switch_to(&self, theme: ThemeId) -> Result<(), ThemeError> {
        let token = self.state.borrow_mut().begin(theme);
        tracing::info!(theme = %theme, "switching theme");

        if let Err(error) = self.ensure_stylesheet_loaded(theme.as_str()).await {
            self.state.borrow_mut().fail(token, theme, error.clone());
            return Err(error);
        }

        if !self.state.borrow().is_current(token) {
            tracing::warn!(theme = %theme, "theme switch superseded by a later switch");
            return Err(ThemeError::Superseded { theme });
        }

        if let Err(error) = self.document.check_marker(&self.config.marker(theme.as_str())) {
            tracing::warn!(theme = %theme, error = %error, "document cannot take theme marker");
            let error = ThemeError::from(error);
            self.state.borrow_mut().fail(token, theme, error.clone());
            return Err(error);
        }

        if let Err(error) = self.store.set(&self.config.storage_key, theme.as_str()) {
            tracing::warn!(theme = %theme, error = %error, "could not persist theme");
            let error = ThemeError::from(error);
            self.state.borrow_mut().fail(token, theme, error.clone());
            return Err(error);
        }

        if let Err(error) = self.apply_markers(theme) {
            tracing::warn!(theme = %theme, error = %error, "could not move theme marker");
            let error = ThemeError::from(error);
            self.state.borrow_mut().fail(token, theme, error.clone());
            return Err(error);
        }
        self.state.borrow_mut().activate(theme);
        tracing::info!(theme = %theme, "theme active");

        self.notifier.notify(&ThemeChanged { theme });
        Ok(())
    }

    /// Activates the persisted theme, or `default_theme` if none is usable.
    ///
    /// A persisted value outside the catalog is ignored. Returns the theme
    /// that was activated.
    pub async fn initialize(&self, default_theme: ThemeId) -> Result<ThemeId, ThemeError> {
        let stored = self
            .store
            .get(&self.config.storage_key)
            .filter(|value| !value.is_empty());

        let theme = match stored {
            Some(stored) => ThemeId::parse(&stored).unwrap_or_else(|| {
                tracing::warn!(
                    stored = %stored,
                    fallback = %default_theme,
                    "ignoring persisted theme outside the catalog"
                );
                default_theme
            }),
            None => default_theme,
        };

        self.switch_to(theme).await?;
        Ok(theme)
    }

    /// [`initialize`](Self::initialize) with the configured default theme.
    pub async fn initialize_default(&self) -> Result<ThemeId, ThemeError> {
        self.initialize(self.config.default_theme).await
    }

    /// The switcher's state.
    pub fn state(&self) -> ThemeState {
        self.state.borrow().phase.clone()
    }

    /// The theme whose marker is active on the document.
    pub fn current_theme(&self) -> Option<ThemeId> {
        self.state.borrow().displayed
    }

    /// True while the most recent switch is waiting for its stylesheet.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().phase.is_loading()
    }

    /// Sets `theme`'s marker, then clears every other catalog marker.
    fn apply_markers(&self, theme: ThemeId) -> Result<(), MarkerError> {
        self.document
            .set_marker(&self.config.marker(theme.as_str()), true)?;
        for other in ThemeId::all().filter(|other| *other != theme) {
            self.document
                .set_marker(&self.config.marker(other.as_str()), false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;
    use crate::document::{
        AttachFuture, MemoryDocument, StaticFetcher, StylesheetAttacher, StylesheetLink,
    };
    use crate::error::StoreError;
    use crate::events::ThemeEvents;
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use tracing_test::traced_test;

    type TestLoader = ThemeLoader<MemoryDocument, MemoryStore, ThemeEvents>;

    fn fetcher() -> StaticFetcher {
        StaticFetcher::new()
            .with_sheet("bayer.theme.css", ":root { --primary-400: #10384f }")
            .with_sheet("velocity.theme.css", ":root { --primary-400: #ff3162 }")
            .with_failure("asgrow.theme.css", "network error")
    }

    fn loader_with(store: MemoryStore) -> TestLoader {
        ThemeLoader::new(
            ThemeConfig::default(),
            MemoryDocument::new(fetcher()),
            store,
            ThemeEvents::new(),
        )
    }

    fn theme(name: &str) -> ThemeId {
        ThemeId::parse(name).unwrap()
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_string(),
                reason: "read-only".to_string(),
            })
        }
    }

    /// A document whose marker host is missing, like a page without `<body>`.
    struct Bodiless(MemoryDocument);

    impl StylesheetAttacher for Bodiless {
        fn is_attached(&self, id: &str) -> bool {
            self.0.is_attached(id)
        }

        fn attach(&self, link: StylesheetLink) -> AttachFuture {
            self.0.attach(link)
        }
    }

    impl Document for Bodiless {
        fn check_marker(&self, class: &str) -> Result<(), MarkerError> {
            Err(MarkerError {
                class: class.to_string(),
                reason: "document has no <body>".to_string(),
            })
        }

        fn set_marker(&self, class: &str, _active: bool) -> Result<(), MarkerError> {
            self.check_marker(class)
        }

        fn has_marker(&self, class: &str) -> bool {
            self.0.has_marker(class)
        }

        fn computed_property(&self, name: &str) -> Option<String> {
            self.0.computed_property(name)
        }
    }

    #[test]
    fn test_switch_activates_single_marker() {
        let loader = loader_with(MemoryStore::new());
        block_on(loader.switch_theme("bayer")).unwrap();
        block_on(loader.switch_theme("velocity")).unwrap();

        assert_eq!(loader.document().markers(), vec!["theme-velocity"]);
        assert_eq!(loader.current_theme(), Some(theme("velocity")));
        assert_eq!(loader.state(), ThemeState::Active(theme("velocity")));
        assert_eq!(
            loader.store().get("element-theme").as_deref(),
            Some("velocity")
        );
    }

    #[test]
    fn test_switch_to_same_theme_is_idempotent() {
        let loader = loader_with(MemoryStore::new());
        let rx = loader.notifier().subscribe();

        block_on(loader.switch_theme("bayer")).unwrap();
        block_on(loader.switch_theme("bayer")).unwrap();

        assert_eq!(loader.document().link_count("theme-bayer"), 1);
        assert_eq!(loader.document().markers(), vec!["theme-bayer"]);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_invalid_theme_rejected_without_fetch() {
        let loader = loader_with(MemoryStore::new());
        let err = block_on(loader.switch_theme("legacy-blue")).unwrap_err();

        assert_eq!(err, ThemeError::InvalidTheme("legacy-blue".to_string()));
        assert!(loader.document().links().is_empty());
        assert_eq!(loader.state(), ThemeState::Uninitialized);
    }

    #[test]
    fn test_failed_switch_changes_nothing() {
        let loader = loader_with(MemoryStore::new());
        block_on(loader.switch_theme("bayer")).unwrap();
        let rx = loader.notifier().subscribe();

        let err = block_on(loader.switch_theme("asgrow")).unwrap_err();

        assert_eq!(err.load_failure_theme(), Some("asgrow"));
        assert_eq!(loader.document().markers(), vec!["theme-bayer"]);
        assert_eq!(loader.store().get("element-theme").as_deref(), Some("bayer"));
        assert!(rx.try_recv().is_err());
        assert_eq!(loader.current_theme(), Some(theme("bayer")));
        assert!(matches!(
            loader.state(),
            ThemeState::Failed { theme: t, .. } if t == theme("asgrow")
        ));
    }

    #[test]
    fn test_store_failure_changes_nothing() {
        let loader = ThemeLoader::new(
            ThemeConfig::default(),
            MemoryDocument::new(fetcher()),
            ReadOnlyStore,
            ThemeEvents::new(),
        );
        let rx = loader.notifier().subscribe();

        let err = block_on(loader.switch_theme("bayer")).unwrap_err();

        assert!(matches!(err, ThemeError::Store(_)));
        assert!(loader.document().markers().is_empty());
        assert_eq!(loader.current_theme(), None);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_missing_marker_host_changes_nothing() {
        let store = MemoryStore::with_entry("element-theme", "velocity");
        let loader = ThemeLoader::new(
            ThemeConfig::default(),
            Bodiless(MemoryDocument::new(fetcher())),
            store.clone(),
            ThemeEvents::new(),
        );
        let rx = loader.notifier().subscribe();

        let err = block_on(loader.switch_theme("bayer")).unwrap_err();

        assert_eq!(
            err,
            ThemeError::Marker(MarkerError {
                class: "theme-bayer".to_string(),
                reason: "document has no <body>".to_string(),
            })
        );
        assert_eq!(store.get("element-theme").as_deref(), Some("velocity"));
        assert_eq!(loader.current_theme(), None);
        assert!(matches!(loader.state(), ThemeState::Failed { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_notification_sees_loaded_theme() {
        let loader = loader_with(MemoryStore::new());
        let rx = loader.notifier().subscribe();

        block_on(loader.switch_theme("velocity")).unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.theme, theme("velocity"));
        assert!(loader.document().has_marker("theme-velocity"));
        assert_eq!(
            loader.document().computed_property("--primary-400").as_deref(),
            Some("#ff3162")
        );
    }

    #[test]
    fn test_initialize_without_persisted_value_uses_default() {
        let loader = loader_with(MemoryStore::new());
        let active = block_on(loader.initialize(theme("bayer"))).unwrap();

        assert_eq!(active, theme("bayer"));
        assert_eq!(loader.state(), ThemeState::Active(theme("bayer")));
    }

    #[test]
    fn test_initialize_prefers_persisted_value() {
        let loader = loader_with(MemoryStore::with_entry("element-theme", "velocity"));
        let active = block_on(loader.initialize(theme("bayer"))).unwrap();

        assert_eq!(active, theme("velocity"));
        assert!(loader.document().has_marker("theme-velocity"));
    }

    #[test]
    fn test_initialize_treats_empty_value_as_absent() {
        let loader = loader_with(MemoryStore::with_entry("element-theme", ""));
        let active = block_on(loader.initialize_default()).unwrap();
        assert_eq!(active, ThemeId::BAYER);
    }

    #[traced_test]
    #[test]
    fn test_initialize_ignores_unknown_persisted_value() {
        let loader = loader_with(MemoryStore::with_entry("element-theme", "corporate-2019"));
        let active = block_on(loader.initialize(theme("velocity"))).unwrap();

        assert_eq!(active, theme("velocity"));
        assert!(logs_contain("ignoring persisted theme outside the catalog"));
    }

    #[test]
    fn test_initialize_propagates_load_failure() {
        let loader = loader_with(MemoryStore::new());
        let err = block_on(loader.initialize(theme("asgrow"))).unwrap_err();

        assert_eq!(err.load_failure_theme(), Some("asgrow"));
        assert_eq!(loader.current_theme(), None);
    }

    #[test]
    fn test_retry_after_failure_reports_cached_error() {
        let loader = loader_with(MemoryStore::new());
        let first = block_on(loader.switch_theme("asgrow")).unwrap_err();
        let second = block_on(loader.switch_theme("asgrow")).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(loader.document().link_count("theme-asgrow"), 1);
    }
}
