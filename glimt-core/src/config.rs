//! Configuration management
//!
//! Settings are stored as settings.json in the glimt directory:
//! ```json
//! {
//!   "app": { "demoMode": false, "uploadsDir": null, ... }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    uploads_dir: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Glimt configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    /// Override for the image uploads directory; defaults to `<glimt_dir>/uploads`
    pub uploads_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from the glimt directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (glimt demo on)
    /// 2. Environment variable GLIMT_DEMO_MODE (for CI/testing)
    pub fn load(glimt_dir: &Path) -> Result<Self> {
        let settings_path = glimt_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for demo mode override (for CI/testing)
        let demo_mode = match std::env::var("GLIMT_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        Ok(Self {
            demo_mode,
            uploads_dir: raw.app.uploads_dir.map(PathBuf::from),
        })
    }

    /// Save config to the glimt directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, glimt_dir: &Path) -> Result<()> {
        let settings_path = glimt_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.app.demo_mode = self.demo_mode;
        settings.app.uploads_dir = self
            .uploads_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// Resolve the uploads directory, defaulting to `<glimt_dir>/uploads`
    pub fn uploads_path(&self, glimt_dir: &Path) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| glimt_dir.join("uploads"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_settings_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
        assert!(config.uploads_dir.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert!(reloaded.demo_mode);
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{"app": {"demoMode": false, "theme": "dark"}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.enable_demo_mode();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(&settings_path).unwrap();
        assert!(content.contains("\"theme\""));
        assert!(content.contains("\"demoMode\": true"));
    }

    #[test]
    fn test_uploads_path_default() {
        let dir = tempdir().unwrap();
        let config = Config::default();
        assert_eq!(config.uploads_path(dir.path()), dir.path().join("uploads"));
    }
}
