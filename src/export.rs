//! Backup export/import. The export document wraps the full report array;
//! import accepts only a well-formed document and applies nothing on error.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::Report;

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub reports: Vec<Report>,
    pub export_date: String,
    pub version: String,
}

pub fn export_bundle(reports: &[Report]) -> ExportBundle {
    ExportBundle {
        reports: reports.to_vec(),
        export_date: Utc::now().to_rfc3339(),
        version: EXPORT_VERSION.to_string(),
    }
}

pub fn write_export(path: &Path, reports: &[Report]) -> Result<()> {
    let bundle = export_bundle(reports);
    fs::write(path, serde_json::to_vec_pretty(&bundle)?)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Parse an export document. Anything without a well-formed `reports` array
/// is rejected whole; existing state is never partially replaced.
pub fn parse_import(raw: &str) -> Result<Vec<Report>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("import file is not valid JSON")?;

    let Some(reports) = value.get("reports") else {
        bail!("import file has no \"reports\" array");
    };
    if !reports.is_array() {
        bail!("import file's \"reports\" field is not an array");
    }

    serde_json::from_value(reports.clone())
        .context("import file's \"reports\" entries are malformed")
}

pub fn read_import(path: &Path) -> Result<Vec<Report>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    parse_import(&raw)
}
