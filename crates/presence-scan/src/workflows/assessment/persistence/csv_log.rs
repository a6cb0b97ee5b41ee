use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{PersistenceError, SubmissionLog, SubmissionRow};

/// Appends submissions to a local CSV file, writing the header on first use.
#[derive(Debug)]
pub struct CsvSubmissionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvSubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionLog for CsvSubmissionLog {
    fn append(&self, row: &SubmissionRow) -> Result<(), PersistenceError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| PersistenceError::Backend("csv log lock poisoned".to_string()))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(SubmissionRow::HEADERS)?;
        }
        writer.write_record(row.cells())?;
        writer.flush()?;
        Ok(())
    }
}
