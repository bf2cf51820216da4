//! Sheet backends per platform and the startup load shared by every launcher.

use std::path::PathBuf;
use std::sync::Arc;

use api::table::DATA_WORKSHEET;
use api::{ChartDataset, ChartRow, Gateway, ResponseRecord, SheetConnection, SheetError};
use once_cell::sync::OnceCell;

use super::config::AppConfig;

/// Everything a session needs from persistence, loaded before the first render.
#[derive(Debug, Clone)]
pub struct Backend {
    pub config: AppConfig,
    pub gateway: Option<Gateway>,
    /// `Err` carries a display message for the blocking error panel.
    pub startup: Result<Startup, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Startup {
    pub dataset: ChartDataset,
    pub responses: Vec<ResponseRecord>,
}

impl Backend {
    /// Open the configured connection and load both worksheets. Blocking; call
    /// before launching the UI.
    pub fn prepare(config: AppConfig) -> Self {
        match open_connection(&config) {
            Ok(conn) => Self::from_gateway(config, Gateway::new(conn)),
            Err(err) => {
                tracing::error!(%err, "could not open sheet connection");
                Self {
                    config,
                    gateway: None,
                    startup: Err(format!("Couldn't open the data connection: {err}")),
                }
            }
        }
    }

    pub fn from_gateway(config: AppConfig, gateway: Gateway) -> Self {
        let startup = load_startup(&gateway).map_err(|err| {
            tracing::error!(%err, "startup load failed");
            format!("Chart data is unavailable: {err}")
        });
        Self {
            config,
            gateway: Some(gateway),
            startup,
        }
    }
}

fn load_startup(gateway: &Gateway) -> Result<Startup, api::GatewayError> {
    let dataset = gateway.load_chart_dataset()?;
    let responses = gateway.load_responses()?;
    tracing::info!(responses = responses.len(), "loaded response log");
    Ok(Startup { dataset, responses })
}

static BACKEND: OnceCell<Backend> = OnceCell::new();

/// Register the backend for this process. Later calls are ignored.
pub fn install(backend: Backend) {
    if BACKEND.set(backend).is_err() {
        tracing::warn!("backend already installed; ignoring");
    }
}

pub fn backend() -> Option<&'static Backend> {
    BACKEND.get()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_connection(config: &AppConfig) -> Result<Arc<dyn SheetConnection>, SheetError> {
    let default_dir = sheets_dir()
        .ok_or_else(|| SheetError::Unavailable("no platform data directory".into()))?;
    config.sheets.connect(&default_dir)
}

#[cfg(target_arch = "wasm32")]
pub fn open_connection(config: &AppConfig) -> Result<Arc<dyn SheetConnection>, SheetError> {
    match config.sheets.backend {
        api::BackendKind::Memory => Ok(Arc::new(api::MemorySheets::new())),
        _ => Ok(Arc::new(LocalStorageSheets)),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "Glance", "Glance")
}

/// Default directory of the CSV backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn sheets_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("sheets"))
}

#[cfg(target_arch = "wasm32")]
pub fn sheets_dir() -> Option<PathBuf> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(target_arch = "wasm32")]
pub fn config_dir() -> Option<PathBuf> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn export_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("exports"))
}

/// Bundled chart rows for installs without a provisioned `Data` sheet.
pub fn sample_dataset() -> ChartDataset {
    ChartDataset::new(vec![
        ChartRow::new("Police brutality", 46.0),
        ChartRow::new("Officer-involved shooting", 31.0),
        ChartRow::new("Homicide", 18.0),
        ChartRow::new("Death", 12.0),
        ChartRow::new("Not riot-related", 7.0),
    ])
}

/// Write [`sample_dataset`] to `Data` if that worksheet does not exist yet.
/// Returns whether anything was written.
pub fn provision_sample_data(conn: &dyn SheetConnection) -> Result<bool, SheetError> {
    match conn.read(DATA_WORKSHEET) {
        Ok(_) => Ok(false),
        Err(SheetError::MissingWorksheet(_)) => {
            conn.update(DATA_WORKSHEET, &sample_dataset().to_table())?;
            tracing::info!(backend = %conn.describe(), "provisioned sample chart data");
            Ok(true)
        }
        Err(err) => Err(err),
    }
}

/// Browser `localStorage`, one JSON table per worksheet.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSheets;

#[cfg(target_arch = "wasm32")]
impl LocalStorageSheets {
    const PREFIX: &'static str = "glance.sheet.";

    fn storage() -> Result<web_sys::Storage, SheetError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| SheetError::Unavailable("localStorage unavailable".into()))
    }

    fn key(worksheet: &str) -> String {
        format!("{}{worksheet}", Self::PREFIX)
    }
}

#[cfg(target_arch = "wasm32")]
impl SheetConnection for LocalStorageSheets {
    fn read(&self, worksheet: &str) -> Result<api::Table, SheetError> {
        let raw = Self::storage()?
            .get_item(&Self::key(worksheet))
            .map_err(|_| SheetError::Unavailable("localStorage read blocked".into()))?
            .ok_or_else(|| SheetError::MissingWorksheet(worksheet.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn update(&self, worksheet: &str, table: &api::Table) -> Result<(), SheetError> {
        let raw = serde_json::to_string(table)?;
        Self::storage()?
            .set_item(&Self::key(worksheet), &raw)
            .map_err(|_| SheetError::Unavailable("localStorage write blocked".into()))
    }

    fn describe(&self) -> String {
        "localStorage".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::MemorySheets;

    #[test]
    fn sample_second_largest_is_the_default_answer() {
        let dataset = sample_dataset();
        let mut amounts: Vec<_> = dataset.rows().iter().collect();
        amounts.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        assert_eq!(amounts[1].topic, "Officer-involved shooting");
    }

    #[test]
    fn provisioning_only_fills_missing_data() {
        let sheets = MemorySheets::new();
        assert!(provision_sample_data(&sheets).unwrap());
        assert!(!provision_sample_data(&sheets).unwrap());
        assert_eq!(
            Gateway::from_connection(sheets)
                .load_chart_dataset()
                .unwrap(),
            sample_dataset()
        );
    }

    #[test]
    fn missing_data_blocks_startup() {
        let backend = Backend::from_gateway(
            AppConfig::default(),
            Gateway::from_connection(MemorySheets::new()),
        );
        let message = backend.startup.unwrap_err();
        assert!(message.contains("Data"));
    }

    #[test]
    fn startup_loads_existing_responses() {
        let sheets = MemorySheets::new();
        provision_sample_data(&sheets).unwrap();
        let gateway = Gateway::from_connection(sheets);
        gateway
            .append_response(&ResponseRecord::new(1, 1.75))
            .unwrap();

        let startup = Backend::from_gateway(AppConfig::default(), gateway)
            .startup
            .unwrap();
        assert_eq!(startup.dataset.len(), 5);
        assert_eq!(startup.responses, vec![ResponseRecord::new(1, 1.75)]);
    }
}
