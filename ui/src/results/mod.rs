mod export;
pub use export::ResultsExportPanel;

mod histogram;
pub use histogram::{bin_values, build_series, Bin, ResponseHistogram, Series, BIN_COUNT};

mod stats;
pub use stats::ResponseStatsTable;
