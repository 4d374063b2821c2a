//! Translation catalog for display labels
//!
//! The catalog maps a language code to its label set. The clock display only
//! consumes the `days` label; the remaining fields are the static page labels
//! the view layer renders once per language switch.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Labels for one language
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePack {
    pub days: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub latency: String,
}

impl Default for LanguagePack {
    fn default() -> Self {
        Self {
            days: "days".to_string(),
            title: "Status".to_string(),
            uptime: "Uptime".to_string(),
            latency: "Latency".to_string(),
        }
    }
}

/// All known languages, keyed by language code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog(HashMap<String, LanguagePack>);

impl Catalog {
    /// Load a catalog from a JSON file keyed by language code
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::WatchError::Config(format!("Failed to read translations {:?}: {}", path, e))
        })?;
        let catalog = serde_json::from_str(&content)?;
        Ok(catalog)
    }

    /// Pack for the given language, falling back to the built-in English labels
    pub fn pack(&self, language: &str) -> LanguagePack {
        match self.0.get(language) {
            Some(pack) => pack.clone(),
            None => {
                if !self.0.is_empty() {
                    tracing::warn!("No translation for '{}', using built-in labels", language);
                }
                LanguagePack::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CATALOG_JSON: &str = r#"{
        "en": {"days": "days", "title": "Bot Status", "uptime": "Uptime", "latency": "Latency"},
        "fr": {"days": "jours"},
        "zh": {"days": "天", "title": "状态"}
    }"#;

    #[test]
    fn load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG_JSON.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.pack("en").days, "days");
        assert_eq!(catalog.pack("fr").days, "jours");
        assert_eq!(catalog.pack("zh").title, "状态");
    }

    #[test]
    fn missing_pack_fields_default_to_empty() {
        let catalog: Catalog = serde_json::from_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.pack("fr").title, "");
    }

    #[test]
    fn unknown_language_falls_back_to_builtin() {
        let catalog: Catalog = serde_json::from_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.pack("de").days, "days");
    }

    #[test]
    fn empty_catalog_uses_builtin() {
        let catalog = Catalog::default();
        assert_eq!(catalog.pack("en").days, "days");
        assert_eq!(catalog.pack("en").title, "Status");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let err = Catalog::load(Path::new("/nonexistent/translations.json")).unwrap_err();
        assert!(matches!(err, crate::WatchError::Config(_)), "{err:?}");
    }

    #[test]
    fn pack_without_days_is_rejected() {
        let result: Result<Catalog, _> = serde_json::from_str(r#"{"en": {"title": "Status"}}"#);
        assert!(result.is_err());
    }
}
