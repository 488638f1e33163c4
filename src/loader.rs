//! Dataset loading
//!
//! Reads the delivery CSV into memory and keeps it for the life of the
//! process. Cells are not interpreted here; numeric coercion belongs to
//! the cleaner.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{DeliveryRecord, RawRecord, REQUIRED_COLUMNS};

pub type RawTable = Vec<RawRecord>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The file '{}' was not found in the directory. Please upload it.", path.display())]
    NotFound { path: PathBuf },

    #[error("Error loading data: could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error loading data: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Error loading data: '{}' is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
}

/// Read the whole table in source order. Any malformed row fails the load.
pub fn read_table(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    info!("Reading CSV from {:?}", path);
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let parse_error = |source: csv::Error| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(parse_error)?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }

    let records: RawTable = reader
        .deserialize::<RawRecord>()
        .collect::<Result<RawTable, csv::Error>>()
        .map_err(parse_error)?;

    info!("Parsed {} records from CSV", records.len());
    Ok(records)
}

/// Write rows as CSV under the source column names plus `Is_Late`.
pub fn write_records(path: &Path, rows: &[DeliveryRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        // serialize() only emits the header alongside the first row
        let mut header: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        header.push("Is_Late");
        writer.write_record(&header)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

/// Load-once cache over the backing file.
///
/// The first successful `load` reads the file; later calls share the same
/// table. `invalidate` forgets it so the next `load` goes back to disk.
/// Failed loads are not cached.
pub struct TableCache {
    path: PathBuf,
    table: RwLock<Option<Arc<RawTable>>>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<RawTable>, LoadError> {
        {
            let cache = self.table.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(table) = cache.as_ref() {
                debug!("Raw table served from cache ({} rows)", table.len());
                return Ok(Arc::clone(table));
            }
        }

        let mut cache = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = cache.as_ref() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(read_table(&self.path)?);
        *cache = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn invalidate(&self) {
        let mut cache = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if cache.take().is_some() {
            info!("Dropped cached table for {:?}", self.path);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Order_ID,Agent_Age,Agent_Rating,Store_Latitude,Store_Longitude,Weather,Traffic,Vehicle,Area,Delivery_Time,Category";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_table_keeps_source_order() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             a1,37,4.9,22.74,75.89,Sunny,High ,motorcycle ,Urban ,120,Clothing\n\
             a2,,N/A,,,Stormy,Jam ,scooter ,Metropolitian ,165,Electronics\n"
        ));

        let table = read_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].order_id.as_deref(), Some("a1"));
        assert_eq!(table[0].vehicle.as_deref(), Some("motorcycle "));
        assert_eq!(table[1].agent_age, None);
        assert_eq!(table[1].agent_rating.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let file = write_csv(&format!(
            "{HEADER},Order_Date\n\
             a1,37,4.9,22.74,75.89,Sunny,High ,van,Urban ,120,Clothing,2022-03-19\n"
        ));
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_table(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains("was not found"));
    }

    #[test]
    fn test_missing_columns() {
        let file = write_csv("Order_ID,Delivery_Time\na1,120\n");
        match read_table(file.path()).unwrap_err() {
            LoadError::MissingColumns { columns, .. } => {
                assert!(columns.contains(&"Weather".to_string()));
                assert!(!columns.contains(&"Delivery_Time".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_rows_fail_whole_load() {
        let file = write_csv(&format!(
            "{HEADER}\n\
             a1,37,4.9,22.74,75.89,Sunny,High ,van,Urban ,120,Clothing\n\
             a2,37,4.9\n"
        ));
        let err = read_table(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().starts_with("Error loading data:"));
    }

    #[test]
    fn test_written_records_read_back() {
        use crate::cleaning::clean;
        use crate::late::derive_late;

        let source = write_csv(&format!(
            "{HEADER}\n\
             a1,37,4.9,22.74,75.89,Sunny,High ,motorcycle ,Urban ,130,\n\
             a2,,,,,Fog,Low ,van,Semi-Urban ,45,Toys\n"
        ));
        let rows = derive_late(clean(&read_table(source.path()).unwrap()), 120.0);

        let out = NamedTempFile::new().unwrap();
        write_records(out.path(), &rows).unwrap();
        let text = std::fs::read_to_string(out.path()).unwrap();
        assert!(text.starts_with("Order_ID,Delivery_Time,"));
        assert!(text.lines().next().unwrap().ends_with(",Is_Late"));

        let again = derive_late(clean(&read_table(out.path()).unwrap()), 120.0);
        assert_eq!(again, rows);
    }

    #[test]
    fn test_empty_export_has_header() {
        let out = NamedTempFile::new().unwrap();
        write_records(out.path(), &[]).unwrap();
        let text = std::fs::read_to_string(out.path()).unwrap();
        assert_eq!(text.trim_end().split(',').count(), 12);
    }

    #[test]
    fn test_cache_loads_once_until_invalidated() {
        let file = write_csv(&format!(
            "{HEADER}\na1,37,4.9,22.74,75.89,Sunny,High ,van,Urban ,120,Clothing\n"
        ));
        let path = file.path().to_path_buf();
        let cache = TableCache::new(path.clone());
        assert!(!cache.is_loaded());

        let first = cache.load().unwrap();
        let second = cache.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Served from memory even after the file is gone
        drop(file);
        assert_eq!(cache.load().unwrap().len(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert!(matches!(cache.load(), Err(LoadError::NotFound { .. })));
    }
}
