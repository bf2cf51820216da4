use std::path::PathBuf;

/// Failures raised by a single sheet backend.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("worksheet `{0}` does not exist")]
    MissingWorksheet(String),

    #[error("column `{0}` is missing")]
    MissingColumn(String),

    #[error("malformed value `{value}` in column `{column}`")]
    Malformed { column: String, value: String },

    #[error("connection unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failures surfaced by [`crate::Gateway`] to the session.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Initial load failed. The session must not render the task.
    #[error("worksheet `{worksheet}` could not be loaded: {source}")]
    DataUnavailable {
        worksheet: &'static str,
        #[source]
        source: SheetError,
    },

    /// A remote write failed. Local state stays authoritative.
    #[error("write to worksheet `{worksheet}` failed: {source}")]
    PersistenceWriteFailed {
        worksheet: &'static str,
        #[source]
        source: SheetError,
    },
}

impl GatewayError {
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
