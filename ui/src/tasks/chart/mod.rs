//! Chart-reading task: a participant reads one of two chart presentations and
//! answers a question about it while a stopwatch runs.

pub mod driver;
pub mod engine;
pub mod layout;
pub mod metrics;
pub mod session;
pub mod writer;

mod context;
mod svg;
mod view;

pub use context::{use_session_provider, SharedSession};
pub use engine::{Action, ChartEngine, ChartVariant, Phase, Transition};
pub use layout::ChartLayout;
pub use metrics::{ResponseSummary, VariantStats, VariantSummary};
pub use session::{ChartSession, LastWrite, ResponseLog, WriteStatus};
pub use svg::ChartFigure;
pub use view::{ChartTaskView, DataUnavailablePanel};
