use tokio::sync::watch;

use pantry_common::theme::{ThemeId, ThemeInfo, THEMES};

use crate::storage::{CookieOptions, KeyValueStore, StorageError};

/// Key the selected theme is persisted under (the cookie name in browsers).
pub const THEME_KEY: &str = "fi-theme";

/// Current UI theme, mirrored to persistent storage.
///
/// Renderers subscribe and apply the value to their root (the `data-theme`
/// attribute on the web). Construct one per session; it always holds a value,
/// starting at [`ThemeId::Default`] until [`ThemeStore::init`] runs.
pub struct ThemeStore<S> {
    storage: S,
    current: watch::Sender<ThemeId>,
}

impl<S: KeyValueStore> ThemeStore<S> {
    pub fn new(storage: S) -> Self {
        let (current, _) = watch::channel(ThemeId::Default);
        Self { storage, current }
    }

    /// Load the persisted theme, publish it, and write it back so its expiry
    /// is refreshed. Missing, expired or unrecognized values load as
    /// `default`. Safe to call more than once.
    pub fn init(&self) -> ThemeId {
        let saved = match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse::<ThemeId>().unwrap_or_else(|e| {
                tracing::warn!("ignoring persisted theme: {e}");
                ThemeId::Default
            }),
            Ok(None) => ThemeId::Default,
            Err(e) => {
                tracing::warn!("could not read persisted theme: {e}");
                ThemeId::Default
            }
        };
        // A write failure is already logged; the in-memory value still applies.
        let _ = self.apply(saved);
        saved
    }

    /// Select `id`. Subscribers see the change even if persisting it fails.
    pub fn set(&self, id: ThemeId) -> Result<(), StorageError> {
        self.apply(id)
    }

    pub fn current(&self) -> ThemeId {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeId> {
        self.current.subscribe()
    }

    /// The fixed picker catalog.
    pub fn themes(&self) -> &'static [ThemeInfo] {
        &THEMES
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn apply(&self, id: ThemeId) -> Result<(), StorageError> {
        self.current.send_replace(id);
        tracing::debug!(theme = %id, "theme applied");
        self.storage
            .set(THEME_KEY, id.as_str(), &CookieOptions::theme())
            .inspect_err(|e| tracing::warn!("could not persist theme {id}: {e}"))
    }
}
