//! Best-effort local persistence: the full report array under one file plus
//! a companion last-update timestamp. A missing or corrupt store loads as
//! empty; it never takes the application down.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::models::Report;

const REPORTS_FILE: &str = "reports.json";
const LAST_UPDATE_FILE: &str = "last_update";

pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    pub fn load(&self) -> Vec<Report> {
        let path = self.dir.join(REPORTS_FILE);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No report store at {}", path.display());
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "Failed reading report store - path={}, error={}",
                    path.display(),
                    err
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(reports) => reports,
            Err(err) => {
                warn!(
                    "Report store is corrupt; starting empty - path={}, error={}",
                    path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    pub fn save(&self, reports: &[Report]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;

        let path = self.dir.join(REPORTS_FILE);
        fs::write(&path, serde_json::to_vec_pretty(reports)?)
            .with_context(|| format!("write {}", path.display()))?;
        fs::write(
            self.dir.join(LAST_UPDATE_FILE),
            Utc::now().to_rfc3339(),
        )
        .with_context(|| "write last_update")?;

        debug!("Saved report store - reports={}", reports.len());
        Ok(())
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        let raw = fs::read_to_string(self.dir.join(LAST_UPDATE_FILE)).ok()?;
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn clear(&self) -> Result<()> {
        for name in [REPORTS_FILE, LAST_UPDATE_FILE] {
            match fs::remove_file(self.dir.join(name)) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err).with_context(|| format!("remove {name}")),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str) -> Report {
        Report {
            id: id.to_string(),
            text: "Broken elevator again".to_string(),
            location: "New York, Queens".to_string(),
            district: "Queens".to_string(),
            coordinates: [40.73, -73.98],
            timestamp: "2025-06-01T12:00:00Z".to_string(),
            category: None,
            sentiment: None,
            emotion: None,
            severity: None,
            analyzed: false,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let reports = vec![report("reddit_a"), report("reddit_b")];
        store.save(&reports).unwrap();

        assert_eq!(store.load(), reports);
        assert!(store.last_update().is_some());
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nowhere"));
        assert!(store.load().is_empty());
        assert!(store.last_update().is_none());
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REPORTS_FILE), "{not json").unwrap();
        let store = Store::new(dir.path());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        store.save(&[report("reddit_a")]).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_empty());
        assert!(store.last_update().is_none());
        // clearing an already-empty store is fine
        store.clear().unwrap();
    }
}
