use std::fmt;
use std::sync::Arc;

use crate::table::{
    responses_from_table, responses_to_table, ChartDataset, ResponseRecord, DATA_WORKSHEET,
    REACTIONS_HEADER, REACTIONS_WORKSHEET,
};
use crate::{GatewayError, SheetConnection, SheetError, WriteMode};

/// Typed operations over the two experiment worksheets.
///
/// Cheap to clone; clones share the connection.
#[derive(Clone)]
pub struct Gateway {
    conn: Arc<dyn SheetConnection>,
}

impl Gateway {
    pub fn new(conn: Arc<dyn SheetConnection>) -> Self {
        Self { conn }
    }

    pub fn from_connection(conn: impl SheetConnection + 'static) -> Self {
        Self::new(Arc::new(conn))
    }

    /// Load the chart rows. Any read or parse failure is fatal for the session.
    pub fn load_chart_dataset(&self) -> Result<ChartDataset, GatewayError> {
        let unavailable = |source| GatewayError::DataUnavailable {
            worksheet: DATA_WORKSHEET,
            source,
        };

        let table = self.conn.read(DATA_WORKSHEET).map_err(unavailable)?;
        let dataset = ChartDataset::from_table(&table).map_err(unavailable)?;
        tracing::info!(
            backend = %self.conn.describe(),
            rows = dataset.len(),
            "loaded chart dataset"
        );
        Ok(dataset)
    }

    /// Load previously recorded responses. A worksheet that does not exist yet
    /// counts as empty; rows that cannot be parsed are skipped.
    pub fn load_responses(&self) -> Result<Vec<ResponseRecord>, GatewayError> {
        let unavailable = |source| GatewayError::DataUnavailable {
            worksheet: REACTIONS_WORKSHEET,
            source,
        };

        let table = match self.conn.read(REACTIONS_WORKSHEET) {
            Ok(table) => table,
            Err(SheetError::MissingWorksheet(_)) => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(err)),
        };

        let parsed = responses_from_table(&table).map_err(unavailable)?;
        if parsed.skipped > 0 {
            tracing::warn!(
                skipped = parsed.skipped,
                worksheet = REACTIONS_WORKSHEET,
                "skipped malformed response rows"
            );
        }
        Ok(parsed.records)
    }

    /// Attempt the append once.
    pub fn append_response(&self, record: &ResponseRecord) -> Result<(), GatewayError> {
        self.conn
            .append(REACTIONS_WORKSHEET, &REACTIONS_HEADER, &record.to_row())
            .map_err(|source| GatewayError::PersistenceWriteFailed {
                worksheet: REACTIONS_WORKSHEET,
                source,
            })
    }

    /// Overwrite the whole `Reactions` worksheet with `records`.
    pub fn resync_responses(&self, records: &[ResponseRecord]) -> Result<(), GatewayError> {
        self.conn
            .update(REACTIONS_WORKSHEET, &responses_to_table(records))
            .map_err(|source| GatewayError::PersistenceWriteFailed {
                worksheet: REACTIONS_WORKSHEET,
                source,
            })
    }

    /// Persist one completed trial according to `mode`. `snapshot` is the full
    /// session log including `record`, used by [`WriteMode::Overwrite`].
    pub fn write_response(
        &self,
        mode: WriteMode,
        record: &ResponseRecord,
        snapshot: &[ResponseRecord],
    ) -> Result<(), GatewayError> {
        match mode {
            WriteMode::Append => self.append_response(record),
            WriteMode::Overwrite => self.resync_responses(snapshot),
        }
    }
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("backend", &self.conn.describe())
            .finish()
    }
}
