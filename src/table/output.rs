//! Table writers

use crate::table::assemble::{Cell, HeadToHeadTable};
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

impl Cell<'_> {
    /// Text rendering for CSV; missing cells are empty
    pub fn to_field(&self) -> String {
        match self {
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Text(s) => s.to_string(),
            Cell::Number(v) => v.to_string(),
            Cell::Int(v) => v.to_string(),
            Cell::Missing => String::new(),
        }
    }

    /// JSON rendering; missing cells are `null`
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Cell::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            Cell::Text(s) => serde_json::Value::String(s.to_string()),
            Cell::Number(v) => serde_json::json!(v),
            Cell::Int(v) => serde_json::json!(v),
            Cell::Missing => serde_json::Value::Null,
        }
    }
}

/// Write the table as CSV with a header row
pub fn write_csv<W: Write>(table: &HeadToHeadTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HeadToHeadTable::column_names())?;
    for row in &table.rows {
        wtr.write_record(row.cells().iter().map(Cell::to_field))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the table as `{"columns": [...], "rows": [[...], ...]}`
pub fn write_json<W: Write>(table: &HeadToHeadTable, writer: W) -> Result<()> {
    let rows: Vec<Vec<serde_json::Value>> = table
        .rows
        .iter()
        .map(|row| row.cells().iter().map(Cell::to_json).collect())
        .collect();
    let doc = serde_json::json!({
        "columns": HeadToHeadTable::column_names(),
        "rows": rows,
    });
    serde_json::to_writer_pretty(writer, &doc)?;
    Ok(())
}

/// Write the table to a file, creating parent directories as needed
pub fn save<P: AsRef<Path>>(table: &HeadToHeadTable, path: P, json: bool) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    if json {
        write_json(table, &mut writer)?;
    } else {
        write_csv(table, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}
