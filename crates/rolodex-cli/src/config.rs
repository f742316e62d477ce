// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rolodex_app::{CoordinatorSettings, RefreshConflict, SearchCase, TextCatalog};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TOAST_SECONDS: i64 = 4;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
            texts: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub search_case: Option<String>,
    pub refresh_conflict: Option<String>,
    pub toast_seconds: Option<i64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            search_case: Some(SearchCase::default().as_str().to_owned()),
            refresh_conflict: Some(RefreshConflict::default().as_str().to_owned()),
            toast_seconds: Some(DEFAULT_TOAST_SECONDS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("ROLODEX_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set ROLODEX_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(rolodex_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and keep values under [storage], [ui], [log] and [texts]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            rolodex_db::validate_db_path(db_path)?;
        }

        if let Some(raw) = &self.ui.search_case
            && SearchCase::parse(raw).is_none()
        {
            bail!(
                "ui.search_case in {} must be \"sensitive\" or \"insensitive\", got {raw:?}",
                path.display()
            );
        }

        if let Some(raw) = &self.ui.refresh_conflict
            && RefreshConflict::parse(raw).is_none()
        {
            bail!(
                "ui.refresh_conflict in {} must be \"proceed\" or \"abort\", got {raw:?}",
                path.display()
            );
        }

        if let Some(seconds) = self.ui.toast_seconds
            && seconds <= 0
        {
            bail!(
                "ui.toast_seconds in {} must be positive, got {}",
                path.display(),
                seconds
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "log.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        self.text_catalog()
            .with_context(|| format!("invalid [texts] in {}", path.display()))?;
        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => rolodex_db::default_db_path(),
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            search_case: self
                .ui
                .search_case
                .as_deref()
                .and_then(SearchCase::parse)
                .unwrap_or_default(),
            refresh_conflict: self
                .ui
                .refresh_conflict
                .as_deref()
                .and_then(RefreshConflict::parse)
                .unwrap_or_default(),
        }
    }

    pub fn toast_duration(&self) -> Duration {
        let seconds = self
            .ui
            .toast_seconds
            .filter(|seconds| *seconds > 0)
            .unwrap_or(DEFAULT_TOAST_SECONDS);
        Duration::from_secs(seconds.unsigned_abs())
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [log].file to a writable path")
        })?;
        Ok(data_root.join(rolodex_db::APP_NAME).join("rolodex.log"))
    }

    pub fn text_catalog(&self) -> Result<TextCatalog> {
        TextCatalog::with_overrides(
            self.texts
                .iter()
                .map(|(key, template)| (key.as_str(), template.as_str())),
        )
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# rolodex config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/rolodex/rolodex.db)\n# db_path = \"/absolute/path/to/rolodex.db\"\n\n[ui]\nsearch_case = \"{}\"\nrefresh_conflict = \"{}\"\ntoast_seconds = {}\n\n[log]\nlevel = \"{}\"\n# file = \"/absolute/path/to/rolodex.log\"\n\n[texts]\n# changesSent = \"Changes have been sent\"\n",
            path.display(),
            SearchCase::default().as_str(),
            RefreshConflict::default().as_str(),
            DEFAULT_TOAST_SECONDS,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use rolodex_app::{RefreshConflict, SearchCase, TextKey};
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        let settings = config.coordinator_settings();
        assert_eq!(settings.search_case, SearchCase::Sensitive);
        assert_eq!(settings.refresh_conflict, RefreshConflict::Proceed);
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\nsearch_case = \"insensitive\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage], [ui], [log] and [texts]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nsearch_case = \"insensitive\"\nrefresh_conflict = \"abort\"\ntoast_seconds = 9\n[log]\nlevel = \"debug\"\nfile = \"/tmp/rolodex-test.log\"\n[texts]\nchangesSent = \"Saved\"\n",
        )?;

        let config = Config::load(&path)?;
        let settings = config.coordinator_settings();
        assert_eq!(settings.search_case, SearchCase::Insensitive);
        assert_eq!(settings.refresh_conflict, RefreshConflict::Abort);
        assert_eq!(config.toast_duration(), Duration::from_secs(9));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/rolodex-test.log"));
        assert_eq!(config.text_catalog()?.text(TextKey::ChangesSent), "Saved");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn unknown_enum_values_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nsearch_case = \"fuzzy\"\n")?;
        let error = Config::load(&path).expect_err("bad search_case should fail");
        assert!(error.to_string().contains("ui.search_case"));

        let (_temp, path) = write_config("version = 1\n[ui]\nrefresh_conflict = \"merge\"\n")?;
        let error = Config::load(&path).expect_err("bad refresh_conflict should fail");
        assert!(error.to_string().contains("ui.refresh_conflict"));
        Ok(())
    }

    #[test]
    fn non_positive_toast_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\ntoast_seconds = 0\n")?;
        let error = Config::load(&path).expect_err("zero toast should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("bad level should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn unknown_text_key_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[texts]\nbogus = \"x\"\n")?;
        let error = Config::load(&path).expect_err("unknown text key should fail");
        let message = format!("{error:#}");
        assert!(message.contains("invalid [texts]"));
        assert!(message.contains("unknown text key \"bogus\""));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("ROLODEX_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("ROLODEX_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn db_path_prefers_storage_config_over_env_override() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"/explicit/from-config.db\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("ROLODEX_DB_PATH", "/from/env.db");
        }
        let config = Config::load(&path)?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("ROLODEX_DB_PATH");
        }
        assert_eq!(config.db_path()?, PathBuf::from("/explicit/from-config.db"));
        Ok(())
    }

    #[test]
    fn db_path_uses_env_override_when_storage_db_path_missing() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("ROLODEX_DB_PATH", "/from/env-only.db");
        }
        let config = Config::load(&path)?;
        let resolved = config.db_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("ROLODEX_DB_PATH");
        }
        assert_eq!(resolved, PathBuf::from("/from/env-only.db"));
        Ok(())
    }

    #[test]
    fn db_path_rejects_uri_style_storage_value() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[storage]\ndb_path = \"https://example.com/rolodex.db\"\n")?;
        let error = Config::load(&path).expect_err("URI db_path should fail validation");
        let message = error.to_string();
        assert!(
            message.contains("looks like a URI") || message.contains("filesystem path"),
            "unexpected message: {message}"
        );
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.version, 1);
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        Ok(())
    }
}
