//! Persistence gateway for Glance.
//!
//! Two sheet-like tables back the experiment: `Data` (the chart source rows)
//! and `Reactions` (one row per completed trial). Everything that touches them
//! goes through a [`SheetConnection`], and the app talks to a [`Gateway`]
//! wrapping one.

pub mod config;
pub mod connection;
pub mod csv;
mod error;
pub mod gateway;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod memory;
pub mod table;

pub use config::{BackendKind, SheetsConfig, WriteMode};
pub use connection::SheetConnection;
pub use error::{ConfigError, GatewayError, SheetError};
pub use gateway::Gateway;
pub use memory::MemorySheets;
pub use table::{ChartDataset, ChartRow, ResponseRecord, Table};
