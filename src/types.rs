//! Request and response types for the write operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One row of input data: column name -> scalar value.
///
/// Backed by an insertion-ordered map (`serde_json` with `preserve_order`),
/// so the first record's key order defines the header row order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Column width policy for the written worksheet.
///
/// - `Auto`: size each column to its longest rendered cell value.
/// - `Fixed(n)`: set every column to exactly `n`.
/// - `Capped(n)`: auto-size, but never wider than `n` (the `"<N"` form).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnWidth {
    Auto,
    Fixed(u16),
    Capped(u16),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Auto
    }
}

impl FromStr for ColumnWidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ColumnWidth::Auto);
        }
        if let Some(rest) = s.strip_prefix('<') {
            let cap: u16 = rest
                .trim()
                .parse()
                .map_err(|_| format!("invalid column width cap '{s}' (expected \"<N\")"))?;
            if cap == 0 {
                return Err(format!("column width cap '{s}' must be positive"));
            }
            return Ok(ColumnWidth::Capped(cap));
        }
        let width: u16 = s.parse().map_err(|_| {
            format!("invalid column width '{s}' (expected \"auto\", an integer, or \"<N\")")
        })?;
        if width == 0 {
            return Err(format!("column width '{s}' must be positive"));
        }
        Ok(ColumnWidth::Fixed(width))
    }
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnWidth::Auto => write!(f, "auto"),
            ColumnWidth::Fixed(width) => write!(f, "{width}"),
            ColumnWidth::Capped(cap) => write!(f, "<{cap}"),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnWidth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A validated write request: everything one invocation needs.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Directory containing the workbook file.
    pub path: PathBuf,
    /// Workbook file name; must end in `.xlsx`.
    pub file: String,
    /// Worksheet to replace or create.
    pub worksheet: String,
    /// Rows to write. `None` fails validation with MissingData.
    pub data: Option<Vec<Record>>,
    /// Register a banded table with this name over the written range.
    pub table_name: Option<String>,
    /// Column sizing policy for the written worksheet.
    pub column_width: ColumnWidth,
    /// Create the directory and workbook when missing.
    pub create: bool,
}

/// Structured result printed to stdout, mirroring the automation-module
/// convention: `{"changed": true}` or `{"failed": true, "msg": "..."}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModuleResponse {
    Changed { changed: bool },
    Failed { failed: bool, msg: String },
}

impl ModuleResponse {
    pub fn changed(changed: bool) -> Self {
        ModuleResponse::Changed { changed }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        ModuleResponse::Failed {
            failed: true,
            msg: msg.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ModuleResponse::Failed { .. })
    }

    /// Render as a single-line JSON document.
    pub fn render(&self) -> String {
        serde_json::to_value(self)
            .map(|value| value.to_string())
            .unwrap_or_else(|_| r#"{"failed": true, "msg": "response serialization failed"}"#.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_width_parse_auto() {
        assert_eq!("auto".parse::<ColumnWidth>().unwrap(), ColumnWidth::Auto);
        assert_eq!("AUTO".parse::<ColumnWidth>().unwrap(), ColumnWidth::Auto);
    }

    #[test]
    fn test_column_width_parse_fixed() {
        assert_eq!("50".parse::<ColumnWidth>().unwrap(), ColumnWidth::Fixed(50));
        assert_eq!("1".parse::<ColumnWidth>().unwrap(), ColumnWidth::Fixed(1));
    }

    #[test]
    fn test_column_width_parse_capped() {
        assert_eq!(
            "<42".parse::<ColumnWidth>().unwrap(),
            ColumnWidth::Capped(42)
        );
    }

    #[test]
    fn test_column_width_parse_rejects_garbage() {
        assert!("wide".parse::<ColumnWidth>().is_err());
        assert!("<auto".parse::<ColumnWidth>().is_err());
        assert!("-3".parse::<ColumnWidth>().is_err());
        assert!("0".parse::<ColumnWidth>().is_err());
        assert!("<0".parse::<ColumnWidth>().is_err());
    }

    #[test]
    fn test_column_width_roundtrip_display() {
        for raw in ["auto", "50", "<42"] {
            let parsed: ColumnWidth = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn test_response_render_changed() {
        let response = ModuleResponse::changed(true);
        assert_eq!(response.render(), r#"{"changed":true}"#);
        assert!(!response.is_failure());
    }

    #[test]
    fn test_response_render_failure() {
        let response = ModuleResponse::failure("boom");
        assert_eq!(response.render(), r#"{"failed":true,"msg":"boom"}"#);
        assert!(response.is_failure());
    }

    #[test]
    fn test_record_preserves_key_order() {
        let record: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
