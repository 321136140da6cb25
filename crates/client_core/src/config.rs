use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::protocol::{PREDICT_PATH, UPLOAD_FIELD_NAME};
use url::Url;

/// Base origin baked in at build time via `PREDICT_API_BASE`.
pub const DEFAULT_API_BASE: &str = match option_env!("PREDICT_API_BASE") {
    Some(base) => base,
    None => "http://127.0.0.1:8000",
};

pub const CONFIG_FILE_NAME: &str = "predict_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base: String,
    pub predict_path: String,
    pub upload_field: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            predict_path: PREDICT_PATH.to_string(),
            upload_field: UPLOAD_FIELD_NAME.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
    predict_path: Option<String>,
    upload_field: Option<String>,
}

impl ClientSettings {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = non_empty(file_cfg.api_base) {
            self.api_base = v;
        }
        if let Some(v) = non_empty(file_cfg.predict_path) {
            self.predict_path = v;
        }
        if let Some(v) = non_empty(file_cfg.upload_field) {
            self.upload_field = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = non_empty(lookup("PREDICT_API_BASE")) {
            self.api_base = v;
        }
        if let Some(v) = non_empty(lookup("APP__API_BASE")) {
            self.api_base = v;
        }
        if let Some(v) = non_empty(lookup("APP__PREDICT_PATH")) {
            self.predict_path = v;
        }
        if let Some(v) = non_empty(lookup("APP__UPLOAD_FIELD")) {
            self.upload_field = v;
        }
    }

    pub fn api_base_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.api_base.trim())
            .with_context(|| format!("invalid prediction api base '{}'", self.api_base))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "prediction api base '{}' must use http or https",
                self.api_base
            );
        }
        Ok(url)
    }

    /// `{api_base}{predict_path}`, joined as plain concatenation.
    pub fn predict_url(&self) -> anyhow::Result<Url> {
        self.api_base_url()?;
        let path = self.predict_path.trim();
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.api_base.trim().trim_end_matches('/'))
        } else {
            format!("{}/{path}", self.api_base.trim().trim_end_matches('/'))
        };
        Url::parse(&joined).with_context(|| format!("invalid predict endpoint '{joined}'"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("bioprint").join(CONFIG_FILE_NAME));
    }
    paths
}

/// Resolves settings as: defaults, then the config file, then environment,
/// then `api_base_override` (the `--api-base` flag). The base is validated
/// only once every layer is applied.
///
/// An explicit `config_path` must exist. Without one, the first readable file
/// from [`default_config_paths`] is used, if any.
pub fn load_settings(
    config_path: Option<&Path>,
    api_base_override: Option<&str>,
) -> anyhow::Result<ClientSettings> {
    load_settings_with_env(config_path, api_base_override, |name| std::env::var(name).ok())
}

fn load_settings_with_env(
    config_path: Option<&Path>,
    api_base_override: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    match config_path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            settings
                .apply_file(&raw)
                .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        }
        None => {
            for candidate in default_config_paths() {
                if let Ok(raw) = fs::read_to_string(&candidate) {
                    settings.apply_file(&raw).with_context(|| {
                        format!("failed to parse config file '{}'", candidate.display())
                    })?;
                    tracing::debug!(path = %candidate.display(), "loaded client config file");
                    break;
                }
            }
        }
    }

    settings.apply_env(lookup);
    if let Some(api_base) = non_empty(api_base_override.map(str::to_string)) {
        settings.api_base = api_base;
    }
    settings.api_base_url()?;
    Ok(settings)
}
