use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_API_BASE_URL: &str =
    "https://nuclei-segmentation-ai-f7f3adfgb6ethuby.canadacentral-01.azurewebsites.net";
pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub preview_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            preview_dir: PathBuf::from("assets/previews"),
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Layers defaults, the settings file, then environment overrides.
pub fn load_settings_with(file: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("preview_dir") {
                settings.preview_dir = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("SEGMENTATION_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__PREVIEW_DIR") {
        settings.preview_dir = PathBuf::from(v);
    }

    settings
}

/// Trims the base URL and strips trailing slashes so that service paths can
/// be appended directly.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("segmentation service base url is empty");
    }

    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid segmentation service base url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "segmentation service base url must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
