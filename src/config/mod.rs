use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::picker::DateRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Last confirmed "created" filter, "YYYY-MM-DD" or empty
    #[serde(default)]
    pub created_from: String,
    #[serde(default)]
    pub created_to: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_font_scale() -> f32 {
    1.0
}

fn default_page_size() -> usize {
    6  // 2 rows x 3 columns
}

fn default_log_filter() -> String {
    "casedesk=info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            access_token: None,
            font_scale: default_font_scale(),
            page_size: default_page_size(),
            log_filter: default_log_filter(),
            created_from: String::new(),
            created_to: String::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .context("Failed to read config file")?;
        serde_json::from_str(&contents)
            .context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.trim().is_empty()
            && self.access_token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Saved "created" filter. A malformed entry is dropped with a warning.
    pub fn created_range(&self) -> DateRange {
        DateRange::parse(&self.created_from, &self.created_to).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring saved created range");
            DateRange::empty()
        })
    }

    pub fn set_created_range(&mut self, range: DateRange) {
        let (from, to) = range.to_strings();
        self.created_from = from;
        self.created_to = to;
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "casedesk", "casedesk")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Backend root without trailing slash, e.g. "http://localhost:8000"
    pub fn base_url(&self) -> String {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        }
    }
}
