//! In-process sheets. Used by tests and as the `memory` backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{SheetConnection, SheetError, Table};

/// Cloning shares the underlying tables, so a test can keep a handle while the
/// gateway owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Mutex<BTreeMap<String, Table>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, worksheet: &str, table: Table) -> Self {
        self.insert_table(worksheet, table);
        self
    }

    pub fn insert_table(&self, worksheet: &str, table: Table) {
        self.inner.tables.lock().insert(worksheet.to_string(), table);
    }

    pub fn table(&self, worksheet: &str) -> Option<Table> {
        self.inner.tables.lock().get(worksheet).cloned()
    }

    /// Make every subsequent read fail with [`SheetError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail with [`SheetError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl SheetConnection for MemorySheets {
    fn read(&self, worksheet: &str) -> Result<Table, SheetError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(SheetError::Unavailable("reads disabled".into()));
        }
        self.table(worksheet)
            .ok_or_else(|| SheetError::MissingWorksheet(worksheet.to_string()))
    }

    fn update(&self, worksheet: &str, table: &Table) -> Result<(), SheetError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetError::Unavailable("writes disabled".into()));
        }
        self.insert_table(worksheet, table.clone());
        Ok(())
    }

    fn append(&self, worksheet: &str, header: &[&str], row: &[String]) -> Result<(), SheetError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetError::Unavailable("writes disabled".into()));
        }
        let mut tables = self.inner.tables.lock();
        tables
            .entry(worksheet.to_string())
            .or_insert_with(|| Table::new(header.iter().copied()))
            .push_named(header, row);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_tables() {
        let sheets = MemorySheets::new();
        let handle = sheets.clone();
        sheets
            .append("Reactions", &["ID", "Time"], &["0".into(), "1.5".into()])
            .unwrap();

        let table = handle.table("Reactions").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.columns, vec!["ID".to_string(), "Time".to_string()]);
    }

    #[test]
    fn unknown_worksheet_is_reported() {
        let err = MemorySheets::new().read("Data").unwrap_err();
        assert!(matches!(err, SheetError::MissingWorksheet(ref w) if w == "Data"));
    }

    #[test]
    fn write_failures_leave_tables_untouched() {
        let sheets = MemorySheets::new().with_table("Reactions", Table::new(["ID", "Time"]));
        sheets.set_fail_writes(true);
        assert!(sheets
            .append("Reactions", &["ID", "Time"], &["1".into(), "2".into()])
            .is_err());
        assert!(sheets.table("Reactions").unwrap().is_empty());
    }
}
