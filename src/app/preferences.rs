use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::ColorScheme;

const COLOR_SCHEME_KEY: &str = "colorScheme";

/// Key/value preferences persisted as a JSON object on disk.
#[derive(Clone, Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/gitstory/preferences.json`, when the platform has a config dir.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("gitstory").join("preferences.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored colour scheme. A missing file or an unknown value reads as
    /// nothing stored.
    pub fn load_color_scheme(&self) -> Result<Option<ColorScheme>> {
        let entries = self.read()?;
        let scheme = entries
            .get(COLOR_SCHEME_KEY)
            .and_then(Value::as_str)
            .and_then(|value| {
                let scheme = ColorScheme::parse(value);
                if scheme.is_none() {
                    log::warn!("Ignoring unknown colour scheme {:?} in {}", value, self.path.display());
                }
                scheme
            });
        Ok(scheme)
    }

    /// Store the colour scheme, keeping any other entries in the file.
    pub fn save_color_scheme(&self, scheme: ColorScheme) -> Result<()> {
        let mut entries = self.read()?;
        entries.insert(
            COLOR_SCHEME_KEY.to_string(),
            Value::String(scheme.as_str().to_string()),
        );
        self.write(&entries)?;
        log::debug!("Saved colour scheme {:?} to {}", scheme.as_str(), self.path.display());
        Ok(())
    }

    fn read(&self) -> Result<Map<String, Value>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(entries) => Ok(entries),
            other => Err(Error::Preference {
                path: self.path.clone(),
                reason: format!("expected a JSON object, found {}", other),
            }),
        }
    }

    fn write(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, PreferenceStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp_dir.path().join("nested").join("preferences.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_missing_file_reads_as_unset() {
        let (_temp_dir, store) = setup_store();
        assert_eq!(store.load_color_scheme().unwrap(), None);
    }

    #[test]
    fn test_color_scheme_round_trip() {
        let (_temp_dir, store) = setup_store();

        for scheme in ColorScheme::ALL {
            store.save_color_scheme(scheme).unwrap();
            assert_eq!(store.load_color_scheme().unwrap(), Some(scheme));
        }

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"colorScheme\": \"dark\""));
    }

    #[test]
    fn test_other_entries_are_kept() {
        let (_temp_dir, store) = setup_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"colorScheme": "sepia", "fontSize": 14}"#).unwrap();

        assert_eq!(store.load_color_scheme().unwrap(), None);

        store.save_color_scheme(ColorScheme::Light).unwrap();
        let saved: Value = serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(saved["fontSize"], 14);
        assert_eq!(saved["colorScheme"], "light");
    }

    #[test]
    fn test_non_object_file_is_an_error() {
        let (_temp_dir, store) = setup_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "[1, 2]").unwrap();

        assert!(matches!(store.load_color_scheme(), Err(Error::Preference { .. })));
    }
}
