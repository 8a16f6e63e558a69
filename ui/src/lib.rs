//! Client-side UI state: the selected theme and the toast queue.
//!
//! Both stores are explicit containers built once per session and handed to
//! whatever renders them; neither talks to the API client.
//!
//! This crate holds no widgets. A renderer (the `pantry` CLI today, a Dioxus
//! front end later) wraps the `watch` receivers from
//! [`ThemeStore::subscribe`] and [`ToastStore::subscribe`] in its own reactive
//! primitives, e.g. a `Signal` updated from a spawned task.

pub mod storage;
pub mod theme;
pub mod toast;

pub use storage::{CookieOptions, FileStore, KeyValueStore, MemoryStore, SameSite, StorageError};
pub use theme::{ThemeStore, THEME_KEY};
pub use toast::{ToastStore, DEFAULT_DURATION};
