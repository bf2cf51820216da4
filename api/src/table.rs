//! Table model shared by every backend, plus the typed rows of the two
//! worksheets the experiment uses.

use serde::{Deserialize, Serialize};

use crate::SheetError;

pub const DATA_WORKSHEET: &str = "Data";
pub const REACTIONS_WORKSHEET: &str = "Reactions";

pub const TOPIC_COLUMN: &str = "Topic";
pub const AMOUNT_COLUMN: &str = "Amount";
pub const ID_COLUMN: &str = "ID";
pub const TIME_COLUMN: &str = "Time";

/// Header used when a `Reactions` table has to be created from scratch.
pub const REACTIONS_HEADER: [&str; 2] = [ID_COLUMN, TIME_COLUMN];

/// A worksheet as plain text cells. Typed parsing happens in the row helpers below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header. Surrounding whitespace in the header is ignored.
    pub fn column_index(&self, name: &str) -> Result<usize, SheetError> {
        self.columns
            .iter()
            .position(|column| column.trim() == name)
            .ok_or_else(|| SheetError::MissingColumn(name.to_string()))
    }

    /// Append a row given in `header` order, re-ordered to match this table's columns.
    /// Columns the table lacks are added; cells the row lacks are left blank.
    pub fn push_named(&mut self, header: &[&str], row: &[String]) {
        for name in header {
            if self.column_index(name).is_err() {
                self.columns.push((*name).to_string());
                for existing in &mut self.rows {
                    existing.push(String::new());
                }
            }
        }

        let mut cells = vec![String::new(); self.columns.len()];
        for (name, value) in header.iter().zip(row) {
            if let Ok(idx) = self.column_index(name) {
                cells[idx] = value.clone();
            }
        }
        self.rows.push(cells);
    }

    fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map(|cell| cell.trim()).unwrap_or("")
    }
}

/// One bar of the experiment chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub topic: String,
    pub amount: f64,
}

impl ChartRow {
    pub fn new(topic: impl Into<String>, amount: f64) -> Self {
        Self {
            topic: topic.into(),
            amount,
        }
    }
}

/// Rows of the `Data` worksheet in sheet order. Loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    rows: Vec<ChartRow>,
}

impl ChartDataset {
    pub fn new(rows: Vec<ChartRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn from_table(table: &Table) -> Result<Self, SheetError> {
        let topic_idx = table.column_index(TOPIC_COLUMN)?;
        let amount_idx = table.column_index(AMOUNT_COLUMN)?;

        let rows = table
            .rows
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| {
                let topic = Table::cell(row, topic_idx).to_string();
                let raw_amount = Table::cell(row, amount_idx);
                let amount = parse_number(raw_amount)
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| SheetError::Malformed {
                        column: AMOUNT_COLUMN.to_string(),
                        value: raw_amount.to_string(),
                    })?;
                Ok(ChartRow { topic, amount })
            })
            .collect::<Result<Vec<_>, SheetError>>()?;

        Ok(Self { rows })
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new([TOPIC_COLUMN, AMOUNT_COLUMN]);
        for row in &self.rows {
            table.rows.push(vec![row.topic.clone(), row.amount.to_string()]);
        }
        table
    }
}

/// Outcome of one completed trial: which chart variant was shown and how long
/// the participant took. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub subject_category: u32,
    pub elapsed_seconds: f64,
}

impl ResponseRecord {
    pub fn new(subject_category: u32, elapsed_seconds: f64) -> Self {
        Self {
            subject_category,
            elapsed_seconds,
        }
    }

    /// Cells in [`REACTIONS_HEADER`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.subject_category.to_string(),
            self.elapsed_seconds.to_string(),
        ]
    }
}

/// Parsed `Reactions` rows plus the number of rows that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponses {
    pub records: Vec<ResponseRecord>,
    pub skipped: usize,
}

pub fn responses_from_table(table: &Table) -> Result<ParsedResponses, SheetError> {
    if table.columns.is_empty() && table.rows.is_empty() {
        return Ok(ParsedResponses::default());
    }

    let id_idx = table.column_index(ID_COLUMN)?;
    let time_idx = table.column_index(TIME_COLUMN)?;

    let mut parsed = ParsedResponses::default();
    for row in &table.rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let id = parse_category(Table::cell(row, id_idx));
        let time = parse_number(Table::cell(row, time_idx))
            .filter(|seconds| seconds.is_finite() && *seconds >= 0.0);

        match (id, time) {
            (Some(id), Some(seconds)) => parsed.records.push(ResponseRecord::new(id, seconds)),
            _ => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

pub fn responses_to_table(records: &[ResponseRecord]) -> Table {
    let mut table = Table::new(REACTIONS_HEADER);
    table.rows = records.iter().map(ResponseRecord::to_row).collect();
    table
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Spreadsheets hand integers back as `1` or `1.0`; both mean category 1.
fn parse_category(raw: &str) -> Option<u32> {
    if let Ok(id) = raw.parse::<u32>() {
        return Some(id);
    }
    let value = parse_number(raw)?;
    if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_parses_in_sheet_order() {
        let table = Table::new(["Topic", "Amount"])
            .with_row(["Homicide", "18"])
            .with_row(["Officer-involved shooting", "31.5"]);

        let dataset = ChartDataset::from_table(&table).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[0].topic, "Homicide");
        assert_eq!(dataset.rows()[1].amount, 31.5);
    }

    #[test]
    fn dataset_rejects_non_numeric_amounts() {
        let table = Table::new(["Topic", "Amount"]).with_row(["Death", "many"]);
        let err = ChartDataset::from_table(&table).unwrap_err();
        assert!(matches!(err, SheetError::Malformed { .. }));
    }

    #[test]
    fn dataset_requires_both_columns() {
        let table = Table::new(["Topic"]).with_row(["Death"]);
        let err = ChartDataset::from_table(&table).unwrap_err();
        assert!(matches!(err, SheetError::MissingColumn(ref c) if c == "Amount"));
    }

    #[test]
    fn responses_skip_malformed_rows() {
        let table = Table::new(["ID", "Time"])
            .with_row(["0", "1.25"])
            .with_row(["1.0", "2"])
            .with_row(["x", "3"])
            .with_row(["1", "-4"])
            .with_row(["", ""]);

        let parsed = responses_from_table(&table).unwrap();
        assert_eq!(
            parsed.records,
            vec![ResponseRecord::new(0, 1.25), ResponseRecord::new(1, 2.0)]
        );
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn responses_accept_reordered_columns() {
        let table = Table::new(["Time", "ID"]).with_row(["0.5", "1"]);
        let parsed = responses_from_table(&table).unwrap();
        assert_eq!(parsed.records, vec![ResponseRecord::new(1, 0.5)]);
    }

    #[test]
    fn push_named_follows_existing_column_order() {
        let mut table = Table::new(["Time", "ID"]);
        let record = ResponseRecord::new(1, 0.75);
        table.push_named(&REACTIONS_HEADER, &record.to_row());
        assert_eq!(table.rows[0], vec!["0.75".to_string(), "1".to_string()]);
    }

    #[test]
    fn push_named_adds_missing_columns() {
        let mut table = Table::default();
        table.push_named(&REACTIONS_HEADER, &ResponseRecord::new(0, 3.0).to_row());
        assert_eq!(table.columns, vec!["ID".to_string(), "Time".to_string()]);
        assert_eq!(table.rows[0], vec!["0".to_string(), "3".to_string()]);
    }
}
