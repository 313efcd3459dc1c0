use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{UserId, PLACEHOLDER_USER_ID};

pub const DEFAULT_CONFIG_FILE: &str = "notes.toml";
pub const DEFAULT_TABLE: &str = "notes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub table: String,
    pub user_id: UserId,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table: DEFAULT_TABLE.into(),
            user_id: PLACEHOLDER_USER_ID,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    supabase_url: Option<String>,
    supabase_key: Option<String>,
    table: Option<String>,
    user_id: Option<i64>,
}

impl Settings {
    /// CLI flags win over everything else.
    pub fn with_overrides(
        mut self,
        supabase_url: Option<String>,
        supabase_key: Option<String>,
    ) -> Self {
        if let Some(v) = non_empty(supabase_url) {
            self.supabase_url = Some(v);
        }
        if let Some(v) = non_empty(supabase_key) {
            self.supabase_key = Some(v);
        }
        self
    }
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly named file must be readable; the default `notes.toml` is
/// optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(config_path, |name| std::env::var(name).ok())
}

fn load_settings_with(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match config_path {
        Some(path) => Some(read_file_settings(path)?),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(read_file_settings(&default_path)?)
            } else {
                None
            }
        }
    };

    if let Some(file_cfg) = file_cfg {
        if let Some(v) = non_empty(file_cfg.supabase_url) {
            settings.supabase_url = Some(v);
        }
        if let Some(v) = non_empty(file_cfg.supabase_key) {
            settings.supabase_key = Some(v);
        }
        if let Some(v) = non_empty(file_cfg.table) {
            settings.table = v;
        }
        if let Some(v) = file_cfg.user_id {
            settings.user_id = UserId(v);
        }
    }

    let lookup = |name: &str| non_empty(env(name));

    if let Some(v) = lookup("SUPABASE_URL") {
        settings.supabase_url = Some(v);
    }
    if let Some(v) = lookup("APP__SUPABASE_URL") {
        settings.supabase_url = Some(v);
    }

    if let Some(v) = lookup("SUPABASE_KEY") {
        settings.supabase_key = Some(v);
    }
    if let Some(v) = lookup("APP__SUPABASE_KEY") {
        settings.supabase_key = Some(v);
    }

    if let Some(v) = lookup("APP__NOTES_TABLE") {
        settings.table = v;
    }

    if let Some(v) = lookup("APP__USER_ID") {
        match v.parse::<i64>() {
            Ok(parsed) => settings.user_id = UserId(parsed),
            Err(err) => tracing::warn!("ignoring APP__USER_ID={v}: {err}"),
        }
    }

    Ok(settings)
}

fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
