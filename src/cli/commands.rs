//! CLI command implementations for the xlsheet binary.

use crate::error::XlsheetResult;
use crate::types::{ColumnWidth, Record, WriteRequest};
use crate::writer::WorksheetWriter;
use std::path::PathBuf;
use tracing::debug;

/// Raw arguments of the `write` subcommand, before the data payload is parsed.
#[derive(Debug, Clone)]
pub struct WriteArgs {
    pub path: PathBuf,
    pub file: String,
    pub worksheet: String,
    /// JSON list of records, still unparsed.
    pub data: Option<String>,
    pub table_name: Option<String>,
    pub column_width: ColumnWidth,
    pub create: bool,
}

/// Execute the write command. Returns the "changed" flag on success.
pub fn write(args: WriteArgs) -> XlsheetResult<bool> {
    let data = match args.data {
        Some(raw) => Some(parse_records(&raw)?),
        None => None,
    };

    let request = WriteRequest {
        path: args.path,
        file: args.file,
        worksheet: args.worksheet,
        data,
        table_name: args.table_name,
        column_width: args.column_width,
        create: args.create,
    };
    debug!(
        file = %request.file,
        worksheet = %request.worksheet,
        create = request.create,
        "running write operation"
    );

    WorksheetWriter::new(&request).write()
}

fn parse_records(raw: &str) -> XlsheetResult<Vec<Record>> {
    let records: Vec<Record> = serde_json::from_str(raw)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_list_of_objects() {
        let records = parse_records(r#"[{"name": "Ann", "age": 30}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "Ann");
    }

    #[test]
    fn test_parse_records_rejects_non_list() {
        assert!(parse_records(r#"{"name": "Ann"}"#).is_err());
        assert!(parse_records("[1, 2, 3]").is_err());
        assert!(parse_records("not json").is_err());
    }
}
