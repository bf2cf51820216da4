use crate::{SheetError, Table};

/// Access to a set of named worksheets.
///
/// Implementations are shared between the UI thread and the background writer,
/// so they must be `Send + Sync`.
pub trait SheetConnection: Send + Sync {
    /// Read the whole worksheet. Unknown worksheets yield [`SheetError::MissingWorksheet`].
    fn read(&self, worksheet: &str) -> Result<Table, SheetError>;

    /// Replace the whole worksheet with `table`, creating it if needed.
    fn update(&self, worksheet: &str, table: &Table) -> Result<(), SheetError>;

    /// Append one row given in `header` order.
    ///
    /// The default reads the table, appends locally and writes everything back.
    /// Backends with a native append should override it.
    fn append(&self, worksheet: &str, header: &[&str], row: &[String]) -> Result<(), SheetError> {
        let mut table = match self.read(worksheet) {
            Ok(table) => table,
            Err(SheetError::MissingWorksheet(_)) => Table::new(header.iter().copied()),
            Err(err) => return Err(err),
        };
        table.push_named(header, row);
        self.update(worksheet, &table)
    }

    /// Short human label used in logs.
    fn describe(&self) -> String;
}
