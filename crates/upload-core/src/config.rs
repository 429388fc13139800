use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::api::ApiStyle;

const CONFIG_FILE: &str = "config.json";
const FALLBACK_CONFIG_FILE: &str = "upload-client-config.json";

/// Client settings, read once at startup. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL (e.g., http://localhost:8000)
    pub backend_url: String,

    /// Endpoint layout the backend exposes
    pub api_style: ApiStyle,
}

impl ClientConfig {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..Self::default()
        }
    }

    /// Platform config dir, or a file in the working directory when there is none
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "file-upload", "client")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CONFIG_FILE))
    }

    /// Settings from `path`, or defaults when nothing has been saved there yet
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read(path) {
            Ok(data) => serde_json::from_slice(&data)
                .with_context(|| format!("invalid config in {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read config {}", path.display())),
        }
    }

    /// Command-line and environment values win over the file
    pub fn apply_overrides(&mut self, backend_url: Option<String>, api_style: Option<ApiStyle>) {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        if let Some(style) = api_style {
            self.api_style = style;
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let mut data = serde_json::to_string_pretty(self)?;
        data.push('\n');
        std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Check the backend URL once, before any request goes out
    pub fn validate(&self) -> Result<Url> {
        if self.backend_url.trim().is_empty() {
            bail!("backend URL is required (--backend-url, BACKEND_API_URL or config file)");
        }
        let url = Url::parse(self.backend_url.trim())
            .with_context(|| format!("invalid backend URL '{}'", self.backend_url))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => bail!("unsupported backend URL scheme '{}' (expected http or https)", other),
        }
    }
}
