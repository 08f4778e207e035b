//! Audit storage trait and the built-in backends.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::entry::AuditRecord;
use crate::error::{AuditError, AuditResult};

/// Storage backend for audit records.
///
/// Implementations must be thread-safe and preserve insertion order.
pub trait AuditStorage: Send + Sync + std::fmt::Debug {
    /// Append a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn append(&self, record: &AuditRecord) -> AuditResult<()>;

    /// All records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or decoding fails.
    fn records(&self) -> AuditResult<Vec<AuditRecord>>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn count(&self) -> AuditResult<usize> {
        Ok(self.records()?.len())
    }
}

/// Storage that keeps nothing; the `tracing` summary line written by
/// [`AuditLog`](crate::AuditLog) is the only trace of a record.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnlyAuditStorage;

impl LogOnlyAuditStorage {
    /// Create the sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl AuditStorage for LogOnlyAuditStorage {
    fn append(&self, _record: &AuditRecord) -> AuditResult<()> {
        Ok(())
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        Ok(Vec::new())
    }
}

/// Unbounded process-local storage for tests and short-lived tooling.
///
/// Grows by one record per audited operation; servers should use
/// [`JsonlAuditStorage`] or [`LogOnlyAuditStorage`].
#[derive(Debug, Default)]
pub struct MemoryAuditStorage {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditStorage for MemoryAuditStorage {
    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn count(&self) -> AuditResult<usize> {
        Ok(self.records.read().unwrap_or_else(PoisonError::into_inner).len())
    }
}

/// Append-only JSON-lines file: one record per line.
///
/// The file (but not its parent directory) is created on first append.
#[derive(Debug)]
pub struct JsonlAuditStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditStorage {
    /// Use the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the audit file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> AuditError {
        AuditError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl AuditStorage for JsonlAuditStorage {
    fn append(&self, record: &AuditRecord) -> AuditResult<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes()).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))
    }

    fn records(&self) -> AuditResult<Vec<AuditRecord>> {
        let file = match std::fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error(e))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}
