//! Directory of CSV files, one per worksheet (`<dir>/<worksheet>.csv`).
//!
//! This is the default local backend on desktop. Files stay editable in any
//! spreadsheet tool, which is how the `Data` sheet is usually provisioned.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::{SheetConnection, SheetError, Table};

#[derive(Debug, Clone)]
pub struct CsvSheets {
    dir: PathBuf,
}

impl CsvSheets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, worksheet: &str) -> PathBuf {
        self.dir.join(format!("{worksheet}.csv"))
    }
}

impl SheetConnection for CsvSheets {
    fn read(&self, worksheet: &str) -> Result<Table, SheetError> {
        let path = self.path_for(worksheet);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(SheetError::MissingWorksheet(worksheet.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        let mut records = parse_csv(&contents).into_iter();
        let columns = records.next().unwrap_or_default();
        Ok(Table {
            columns,
            rows: records.collect(),
        })
    }

    fn update(&self, worksheet: &str, table: &Table) -> Result<(), SheetError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(worksheet);
        let staging = path.with_extension("csv.tmp");
        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(render_csv(table).as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.dir.display())
    }
}

pub fn render_csv(table: &Table) -> String {
    let mut csv = String::new();
    for row in std::iter::once(&table.columns).chain(table.rows.iter()) {
        let line = row
            .iter()
            .map(|field| escape_csv(field))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }
    csv
}

pub fn escape_csv(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    let needs_quotes =
        value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r');
    if needs_quotes {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// RFC 4180 style reader: quoted fields may contain commas, doubled quotes and
/// line breaks. Blank lines are dropped.
pub fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].is_empty();
    if !blank {
        records.push(record);
    }
}
