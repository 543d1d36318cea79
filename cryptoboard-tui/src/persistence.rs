//! Persistence for the theme preference.
//!
//! The theme lives in the same key/value store as the response cache, under
//! [`THEME_KEY`], as `dark-theme` or `light-theme`.

use cryptoboard_core::{StorageError, ThemeMode};
use cryptoboard_storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Saved theme, or `None` if the user never toggled it.
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<ThemeMode>, PersistenceError> {
    let saved = store.get(THEME_KEY)?;
    Ok(saved.map(|value| ThemeMode::from_storage_value(Some(&value))))
}

pub fn save_theme<S: KeyValueStore + ?Sized>(store: &S, theme: ThemeMode) -> Result<(), PersistenceError> {
    store.set(THEME_KEY, theme.storage_value())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptoboard_storage::MemoryStore;

    #[test]
    fn test_theme_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store).unwrap(), None);

        save_theme(&store, ThemeMode::Light).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light-theme"));
        assert_eq!(load_theme(&store).unwrap(), Some(ThemeMode::Light));
    }

    #[test]
    fn test_unrecognised_value_reads_as_dark() {
        let store = MemoryStore::new();
        store.set(THEME_KEY, "solarized").unwrap();
        assert_eq!(load_theme(&store).unwrap(), Some(ThemeMode::Dark));
    }
}
