//! Connection settings for the `[sheets]` section of the app config.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::csv::CsvSheets;
use crate::{MemorySheets, SheetConnection, SheetError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    Csv,
    Http,
    Memory,
}

/// How completed trials reach the `Reactions` worksheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Append the new row only.
    #[default]
    Append,
    /// Rewrite the whole worksheet from the session log after every trial.
    Overwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetsConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Directory for the CSV backend. Falls back to the platform data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Base URL for the HTTP backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Name of the environment variable holding the HTTP bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
    #[serde(default = "SheetsConfig::default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub write_mode: WriteMode,
}

impl SheetsConfig {
    fn default_timeout_ms() -> u64 {
        5_000
    }

    /// Open the configured backend. `default_dir` is used by the CSV backend
    /// when no `dir` is set.
    pub fn connect(&self, default_dir: &Path) -> Result<Arc<dyn SheetConnection>, SheetError> {
        match self.backend {
            BackendKind::Csv => {
                let dir = self.dir.clone().unwrap_or_else(|| default_dir.to_path_buf());
                Ok(Arc::new(CsvSheets::new(dir)))
            }
            BackendKind::Memory => Ok(Arc::new(MemorySheets::new())),
            BackendKind::Http => self.connect_http(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn connect_http(&self) -> Result<Arc<dyn SheetConnection>, SheetError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| SheetError::Unavailable("`sheets.endpoint` is not set".into()))?;
        let token = self
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|token| !token.is_empty());
        let timeout = std::time::Duration::from_millis(self.timeout_ms);
        Ok(Arc::new(crate::http::HttpSheets::new(
            endpoint, token, timeout,
        )?))
    }

    #[cfg(target_arch = "wasm32")]
    fn connect_http(&self) -> Result<Arc<dyn SheetConnection>, SheetError> {
        Err(SheetError::Unavailable(
            "the http backend is not available in the browser".into(),
        ))
    }
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            dir: None,
            endpoint: None,
            token_env: None,
            timeout_ms: Self::default_timeout_ms(),
            write_mode: WriteMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: SheetsConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, SheetsConfig::default());
        assert_eq!(cfg.timeout_ms, 5_000);
    }

    #[test]
    fn parses_http_backend() {
        let cfg: SheetsConfig = toml::from_str(
            r#"
            backend = "http"
            endpoint = "https://sheets.example/api"
            token_env = "GLANCE_SHEETS_TOKEN"
            write_mode = "overwrite"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backend, BackendKind::Http);
        assert_eq!(cfg.endpoint.as_deref(), Some("https://sheets.example/api"));
        assert_eq!(cfg.write_mode, WriteMode::Overwrite);
    }

    #[test]
    fn http_without_endpoint_fails() {
        let cfg = SheetsConfig {
            backend: BackendKind::Http,
            ..SheetsConfig::default()
        };
        let err = cfg.connect(Path::new(".")).err().unwrap();
        assert!(matches!(err, SheetError::Unavailable(_)));
    }

    #[test]
    fn csv_prefers_configured_dir() {
        let cfg = SheetsConfig {
            dir: Some(PathBuf::from("/tmp/glance-sheets")),
            ..SheetsConfig::default()
        };
        let conn = cfg.connect(Path::new("/nonexistent")).unwrap();
        assert_eq!(conn.describe(), "csv:/tmp/glance-sheets");
    }
}
