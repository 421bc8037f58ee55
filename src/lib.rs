//! Xlsheet - declarative Excel worksheet writer for automation pipelines
//!
//! This library writes a list of uniform records into an `.xlsx` worksheet,
//! optionally wrapped in a named banded table, with column widths computed
//! or fixed. The named worksheet is always replaced wholesale; sibling
//! worksheets keep their cell values.
//!
//! # Features
//!
//! - Headers taken from the first record's keys, in key order
//! - Create-on-demand for missing directories and workbooks
//! - Named table registration with a medium banded style
//! - Column width policies: auto, fixed, or capped auto (`"<N"`)
//! - Structured JSON result (`changed` / `failed` + `msg`)
//!
//! # Example
//!
//! ```no_run
//! use xlsheet::types::{ColumnWidth, WriteRequest};
//! use xlsheet::writer::WorksheetWriter;
//! use std::path::PathBuf;
//!
//! let request = WriteRequest {
//!     path: PathBuf::from("/tmp/reports"),
//!     file: "inventory.xlsx".to_string(),
//!     worksheet: "hosts".to_string(),
//!     data: Some(serde_json::from_str(r#"[{"name": "web1", "cpus": 8}]"#)?),
//!     table_name: Some("hosts".to_string()),
//!     column_width: ColumnWidth::Auto,
//!     create: true,
//! };
//!
//! let changed = WorksheetWriter::new(&request).write()?;
//! assert!(changed);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod error;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{XlsheetError, XlsheetResult};
pub use types::{ColumnWidth, ModuleResponse, Record, WriteRequest};
pub use writer::WorksheetWriter;
