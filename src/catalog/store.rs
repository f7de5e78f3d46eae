//! Flat CSV persistence for the catalog
//!
//! Column order: `designation, permid, name, discoverer, mag1davg, mag2davg,
//! lastobs, lastupdate`. Timestamps are UTC `YYYY-MM-DD HH:MM:SS`; absent
//! values are written as empty cells. Files written by older versions with
//! only `designation,name` columns still load (missing columns read as empty).

use super::{Catalog, TrackedObject};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Csv(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// A row that could not be turned into a `TrackedObject`
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRow {
    /// 1-based line number in the file (header is line 1)
    pub line: u64,
    pub reason: String,
}

/// Result of loading the catalog file
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub malformed: Vec<MalformedRow>,
}

/// On-disk row shape; every cell is text so parsing errors stay per-row
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    designation: String,
    #[serde(default)]
    permid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    discoverer: String,
    #[serde(default)]
    mag1davg: String,
    #[serde(default)]
    mag2davg: String,
    #[serde(default)]
    lastobs: String,
    #[serde(default)]
    lastupdate: String,
}

impl CatalogRow {
    fn from_object(object: &TrackedObject) -> Self {
        Self {
            designation: object.designation.clone(),
            permid: object.permanent_id.clone().unwrap_or_default(),
            name: object.display_name.clone().unwrap_or_default(),
            discoverer: object.discoverer.clone().unwrap_or_default(),
            mag1davg: object.one_day_magnitude_avg.map(|m| m.to_string()).unwrap_or_default(),
            mag2davg: object.two_day_magnitude_avg.map(|m| m.to_string()).unwrap_or_default(),
            lastobs: format_timestamp(object.last_observation_time),
            lastupdate: format_timestamp(object.last_update_time),
        }
    }

    fn into_object(self) -> Result<TrackedObject, String> {
        let designation = self.designation.trim().to_string();
        if designation.is_empty() {
            return Err("blank designation".to_string());
        }

        Ok(TrackedObject {
            designation,
            permanent_id: optional_text(self.permid),
            display_name: optional_text(self.name),
            discoverer: optional_text(self.discoverer),
            one_day_magnitude_avg: parse_magnitude(&self.mag1davg, "mag1davg")?,
            two_day_magnitude_avg: parse_magnitude(&self.mag2davg, "mag2davg")?,
            last_observation_time: parse_timestamp(&self.lastobs, "lastobs")?,
            last_update_time: parse_timestamp(&self.lastupdate, "lastupdate")?,
        })
    }
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_magnitude(value: &str, column: &str) -> Result<Option<f64>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite())
        .map(Some)
        .ok_or_else(|| format!("{}: not a number: {:?}", column, value))
}

fn parse_timestamp(value: &str, column: &str) -> Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| format!("{}: bad timestamp {:?}: {}", column, value, e))
}

fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

fn write_rows(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record([
        "designation", "permid", "name", "discoverer", "mag1davg", "mag2davg", "lastobs",
        "lastupdate",
    ])?;
    for object in catalog.iter() {
        writer.serialize(CatalogRow::from_object(object))?;
    }
    writer.flush()?;
    Ok(())
}

/// CSV file holding the catalog between runs
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog; a missing file is an empty catalog
    ///
    /// Malformed rows are logged, skipped and returned in `LoadOutcome::malformed`.
    pub fn load(&self) -> Result<LoadOutcome, StoreError> {
        if !self.path.exists() {
            log::info!("No existing catalog file found: {}", self.path.display());
            return Ok(LoadOutcome::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let mut objects = Vec::new();
        let mut malformed = Vec::new();

        for result in reader.records() {
            let (line, parsed) = match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    let parsed = record
                        .deserialize::<CatalogRow>(Some(&headers))
                        .map_err(|e| e.to_string())
                        .and_then(CatalogRow::into_object);
                    (line, parsed)
                }
                Err(e) => (e.position().map(|p| p.line()).unwrap_or(0), Err(e.to_string())),
            };

            match parsed {
                Ok(object) => objects.push(object),
                Err(reason) => {
                    log::warn!(
                        "⚠️  Skipping malformed catalog row at line {} of {}: {}",
                        line,
                        self.path.display(),
                        reason
                    );
                    malformed.push(MalformedRow { line, reason });
                }
            }
        }

        let catalog = Catalog::from_objects(objects);
        log::info!(
            "Loaded {} comets from {} ({} malformed rows skipped)",
            catalog.len(),
            self.path.display(),
            malformed.len()
        );

        Ok(LoadOutcome { catalog, malformed })
    }

    /// Write the whole catalog, replacing the file
    ///
    /// Writes to a sibling temp file first and renames it into place.
    pub fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let tmp_path = self.path.with_extension("csv.tmp");

        let written = write_rows(&tmp_path, catalog)
            .and_then(|()| std::fs::rename(&tmp_path, &self.path).map_err(StoreError::from));
        if let Err(e) = written {
            if let Err(cleanup) = std::fs::remove_file(&tmp_path) {
                log::debug!("Could not remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e);
        }

        log::debug!("Saved {} comets to {}", catalog.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn sample_object() -> TrackedObject {
        TrackedObject {
            designation: "C/2025 A6".to_string(),
            permanent_id: Some("500P".to_string()),
            display_name: Some("Lemmon, NASA".to_string()),
            discoverer: Some("Mt. Lemmon Survey".to_string()),
            one_day_magnitude_avg: Some(7.25),
            two_day_magnitude_avg: Some(7.5),
            last_observation_time: Some(Utc.with_ymd_and_hms(2025, 10, 1, 3, 21, 14).unwrap()),
            last_update_time: Some(Utc.with_ymd_and_hms(2025, 10, 1, 6, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("missing.csv"));

        let outcome = store.load().unwrap();

        assert!(outcome.catalog.is_empty());
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("comets.csv"));
        let catalog = Catalog::from_objects(vec![sample_object(), TrackedObject::new("C/2025 R2")]);

        store.save(&catalog).unwrap();
        let reloaded = store.load().unwrap().catalog;

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("C/2025 A6"), Some(&sample_object()));
        assert_eq!(reloaded.get("C/2025 R2"), Some(&TrackedObject::new("C/2025 R2")));
        assert_eq!(reloaded.designations(), vec!["C/2025 A6", "C/2025 R2"]);
    }

    #[test]
    fn test_header_and_column_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comets.csv");
        let store = CatalogStore::new(&path);

        store.save(&Catalog::from_objects(vec![sample_object()])).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();

        assert_eq!(
            lines.next(),
            Some("designation,permid,name,discoverer,mag1davg,mag2davg,lastobs,lastupdate")
        );
        assert_eq!(
            lines.next(),
            Some("C/2025 A6,500P,\"Lemmon, NASA\",Mt. Lemmon Survey,7.25,7.5,2025-10-01 03:21:14,2025-10-01 06:00:00")
        );
    }

    #[test]
    fn test_empty_catalog_writes_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comets.csv");
        CatalogStore::new(&path).save(&Catalog::new()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("designation,permid,name"));
        assert!(CatalogStore::new(&path).load().unwrap().catalog.is_empty());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        // A directory in the way makes the final rename fail
        let path = dir.path().join("comets.csv");
        fs::create_dir(&path).unwrap();

        let result = CatalogStore::new(&path).save(&Catalog::from_objects(vec![sample_object()]));

        assert!(result.is_err());
        assert!(!dir.path().join("comets.csv.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_fractional_observation_time_is_stable_across_reload() {
        use crate::brightness::{BrightnessDetector, ObservationSample};
        use crate::tracker::{apply_observations, BrightnessUpdate};

        let dir = tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("comets.csv"));
        let observed = Utc.with_ymd_and_hms(2025, 9, 10, 3, 21, 14).unwrap() + chrono::Duration::milliseconds(500);
        let samples = vec![ObservationSample::new(observed, Some(9.0))];
        let detector = BrightnessDetector::with_defaults();

        let mut object = TrackedObject::new("C/2025 A6");
        let first = apply_observations(&mut object, &samples, &detector, Utc.with_ymd_and_hms(2025, 9, 11, 0, 0, 0).unwrap());
        assert!(matches!(first, BrightnessUpdate::Updated { .. }));
        store.save(&Catalog::from_objects(vec![object])).unwrap();

        let mut catalog = store.load().unwrap().catalog;
        let reloaded = catalog.get_mut("C/2025 A6").unwrap();
        let stamped = reloaded.last_update_time;
        let second = apply_observations(reloaded, &samples, &detector, Utc.with_ymd_and_hms(2025, 9, 12, 0, 0, 0).unwrap());

        assert_eq!(second, BrightnessUpdate::NoNewData);
        assert_eq!(reloaded.last_update_time, stamped);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comets.csv");
        fs::write(
            &path,
            "designation,permid,name,discoverer,mag1davg,mag2davg,lastobs,lastupdate\n\
             C/2025 A6,,Lemmon,,7.2,7.4,2025-10-01 03:21:14,\n\
             C/2025 R2,,SWAN,,bright,,,\n\
             ,,nameless,,,,,\n\
             C/2025 R3,,,,,,yesterday,\n\
             3I,,ATLAS,,,,,\n",
        )
        .unwrap();

        let outcome = CatalogStore::new(&path).load().unwrap();

        assert_eq!(outcome.catalog.designations(), vec!["C/2025 A6", "3I"]);
        assert_eq!(outcome.malformed.len(), 3);
        assert!(outcome.malformed[0].reason.contains("mag1davg"));
    }

    #[test]
    fn test_legacy_two_column_file_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("known_comets.csv");
        fs::write(&path, "designation,name\nC/2025 R2,SWAN\nC/2025 R3,\n").unwrap();

        let catalog = CatalogStore::new(&path).load().unwrap().catalog;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("C/2025 R2").unwrap().display_name.as_deref(), Some("SWAN"));
        assert!(catalog.get("C/2025 R3").unwrap().display_name.is_none());
    }
}
