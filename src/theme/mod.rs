//! Theme Preference - process-wide tri-state theme configuration.
//!
//! A light/dark/system preference as an explicit configuration object
//! rather than bare global state mirrored into storage:
//!
//! - `init(store)` - read the persisted preference, fall back to dark
//! - `set_preference(p)` - write through to the store, notify subscribers
//! - `resolved()` - map `System` through the host-reported system scheme
//!
//! Subscribers are plain spark-signals consumers: read
//! [`preference_signal`] or [`resolved_theme`] inside an effect and it
//! reruns on change. The host feeds system-scheme changes (the media-query
//! signal) through [`set_system_scheme`].
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::theme::{self, ThemePreference, MemoryStore};
//!
//! theme::init(Box::new(MemoryStore::new()));
//! theme::set_preference(ThemePreference::System);
//! let scheme = theme::resolved(); // follows the system scheme now
//! ```

use std::cell::RefCell;

use spark_signals::{derived, signal, Derived, Signal};

// =============================================================================
// TYPES
// =============================================================================

/// The user's stored preference. `System` defers to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Light,
    /// Dark is the default, matching the marketing pages this ships with.
    #[default]
    Dark,
    System,
}

impl ThemePreference {
    /// Parse from string (case-insensitive), e.g. a stored value.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// Canonical lowercase name, e.g. for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

/// A concrete scheme after resolving `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedTheme {
    Light,
    #[default]
    Dark,
}

// =============================================================================
// STORE
// =============================================================================

/// Where the preference persists between runs. The host decides: a config
/// file, a key-value store, browser storage behind wasm - anything with
/// load/save semantics.
pub trait PreferenceStore {
    /// Read the persisted preference, `None` when nothing is stored yet.
    fn load(&self) -> Option<ThemePreference>;
    /// Persist the preference.
    fn save(&mut self, preference: ThemePreference);
}

/// In-memory store: no persistence, useful as a default and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stored: Option<ThemePreference>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> Option<ThemePreference> {
        self.stored
    }

    fn save(&mut self, preference: ThemePreference) {
        self.stored = Some(preference);
    }
}

// =============================================================================
// PROCESS-WIDE STATE
// =============================================================================

thread_local! {
    static PREFERENCE: Signal<ThemePreference> = signal(ThemePreference::Dark);
    static SYSTEM_SCHEME: Signal<ResolvedTheme> = signal(ResolvedTheme::Light);
    static STORE: RefCell<Option<Box<dyn PreferenceStore>>> = RefCell::new(None);
}

/// Install the store and load the persisted preference. With nothing
/// stored, the dark default is written back, so a fresh install persists
/// its preference immediately.
pub fn init(mut store: Box<dyn PreferenceStore>) {
    let preference = match store.load() {
        Some(stored) => stored,
        None => {
            store.save(ThemePreference::default());
            ThemePreference::default()
        }
    };
    PREFERENCE.with(|s| s.set(preference));
    STORE.with(|cell| *cell.borrow_mut() = Some(store));
}

/// Current preference.
pub fn preference() -> ThemePreference {
    PREFERENCE.with(|s| s.get())
}

/// The preference signal, for reactive subscribers.
pub fn preference_signal() -> Signal<ThemePreference> {
    PREFERENCE.with(|s| s.clone())
}

/// Update the preference: write through to the store (if initialized) and
/// notify subscribers.
pub fn set_preference(preference: ThemePreference) {
    STORE.with(|cell| {
        if let Some(store) = cell.borrow_mut().as_mut() {
            store.save(preference);
        }
    });
    PREFERENCE.with(|s| {
        if s.get() != preference {
            s.set(preference);
        }
    });
}

/// Host-reported system scheme (the media-query signal).
pub fn set_system_scheme(scheme: ResolvedTheme) {
    SYSTEM_SCHEME.with(|s| {
        if s.get() != scheme {
            s.set(scheme);
        }
    });
}

/// Current system scheme as last reported by the host.
pub fn system_scheme() -> ResolvedTheme {
    SYSTEM_SCHEME.with(|s| s.get())
}

/// The preference with `System` resolved through the system scheme.
/// Reading this inside an effect tracks both underlying signals.
pub fn resolved() -> ResolvedTheme {
    match preference() {
        ThemePreference::Light => ResolvedTheme::Light,
        ThemePreference::Dark => ResolvedTheme::Dark,
        ThemePreference::System => system_scheme(),
    }
}

/// Derived resolved theme for hosts that want a handle instead of calling
/// [`resolved`] themselves.
pub fn resolved_theme() -> Derived<ResolvedTheme> {
    derived(resolved)
}

/// Drop the store and restore defaults (for testing).
pub fn reset_theme_state() {
    STORE.with(|cell| *cell.borrow_mut() = None);
    PREFERENCE.with(|s| s.set(ThemePreference::default()));
    SYSTEM_SCHEME.with(|s| s.set(ResolvedTheme::Light));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Store that records saves, for asserting write-through.
    #[derive(Default)]
    struct CountingStore {
        stored: Option<ThemePreference>,
        saves: Rc<Cell<usize>>,
    }

    impl PreferenceStore for CountingStore {
        fn load(&self) -> Option<ThemePreference> {
            self.stored
        }

        fn save(&mut self, preference: ThemePreference) {
            self.stored = Some(preference);
            self.saves.set(self.saves.get() + 1);
        }
    }

    #[test]
    fn test_init_falls_back_to_dark_and_writes_back() {
        reset_theme_state();
        let saves = Rc::new(Cell::new(0));
        let store = CountingStore {
            stored: None,
            saves: saves.clone(),
        };

        init(Box::new(store));
        assert_eq!(preference(), ThemePreference::Dark);
        assert_eq!(saves.get(), 1, "missing preference is persisted once");
        reset_theme_state();
    }

    #[test]
    fn test_init_loads_stored_preference() {
        reset_theme_state();
        let store = CountingStore {
            stored: Some(ThemePreference::Light),
            saves: Rc::new(Cell::new(0)),
        };

        init(Box::new(store));
        assert_eq!(preference(), ThemePreference::Light);
        assert_eq!(resolved(), ResolvedTheme::Light);
        reset_theme_state();
    }

    #[test]
    fn test_set_preference_writes_through() {
        reset_theme_state();
        let saves = Rc::new(Cell::new(0));
        init(Box::new(CountingStore {
            stored: Some(ThemePreference::Dark),
            saves: saves.clone(),
        }));

        set_preference(ThemePreference::System);
        assert_eq!(preference(), ThemePreference::System);
        assert_eq!(saves.get(), 1);
        reset_theme_state();
    }

    #[test]
    fn test_system_preference_follows_system_scheme() {
        reset_theme_state();
        init(Box::new(MemoryStore::new()));
        set_preference(ThemePreference::System);

        set_system_scheme(ResolvedTheme::Dark);
        assert_eq!(resolved(), ResolvedTheme::Dark);

        set_system_scheme(ResolvedTheme::Light);
        assert_eq!(resolved(), ResolvedTheme::Light);

        // A concrete preference ignores the system scheme.
        set_preference(ThemePreference::Dark);
        assert_eq!(resolved(), ResolvedTheme::Dark);
        reset_theme_state();
    }

    #[test]
    fn test_from_str_round_trips() {
        for preference in [
            ThemePreference::Light,
            ThemePreference::Dark,
            ThemePreference::System,
        ] {
            assert_eq!(
                ThemePreference::from_str(preference.as_str()),
                Some(preference)
            );
        }
        assert_eq!(ThemePreference::from_str("Dark"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::from_str("sepia"), None);
    }

    #[test]
    fn test_set_preference_without_init_still_notifies() {
        reset_theme_state();
        set_preference(ThemePreference::Light);
        assert_eq!(preference(), ThemePreference::Light);
        reset_theme_state();
    }
}
