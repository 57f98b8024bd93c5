use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ErrorKind, ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::record::{RecordId, ScoreRecord};

/// Append-only log of completed sessions
pub trait ScoreStore {
    /// Persists `record` and returns its position in append order.
    fn append(&mut self, record: &ScoreRecord) -> Result<RecordId, StoreError>;

    /// Every record ever appended, oldest first.
    fn read_all(&self) -> Result<Vec<(RecordId, ScoreRecord)>, StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    fn append(&mut self, record: &ScoreRecord) -> Result<RecordId, StoreError> {
        (**self).append(record)
    }

    fn read_all(&self) -> Result<Vec<(RecordId, ScoreRecord)>, StoreError> {
        (**self).read_all()
    }
}

/// Scores kept in a csv file with the header `date,score,name,misses,accuracy`.
///
/// Reads are all-or-nothing: the first row that does not parse fails the whole
/// read with [`StoreError::MalformedRecord`] naming that row.
#[derive(Debug, Clone)]
pub struct CsvScoreStore {
    path: PathBuf,
}

impl CsvScoreStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_empty_or_missing(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true)
    }

    /// Whether a non-empty file is missing its final row terminator.
    fn lacks_final_newline(&self) -> Result<bool, StoreError> {
        if self.is_empty_or_missing() {
            return Ok(false);
        }
        let mut file = fs::File::open(&self.path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    /// Number of data rows, whether or not they parse.
    fn row_count(&self) -> Result<usize, StoreError> {
        if self.is_empty_or_missing() {
            return Ok(0);
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let mut count = 0;
        for row in reader.byte_records() {
            row?;
            count += 1;
        }
        Ok(count)
    }
}

fn malformed(row: usize, reason: impl ToString) -> StoreError {
    StoreError::MalformedRecord {
        row,
        reason: reason.to_string(),
    }
}

fn parse_row(
    row: usize,
    raw: &StringRecord,
    headers: &StringRecord,
) -> Result<ScoreRecord, StoreError> {
    let record: ScoreRecord = raw
        .deserialize(Some(headers))
        .map_err(|e| malformed(row, e))?;
    if !(0.0..=1.0).contains(&record.accuracy) {
        return Err(malformed(
            row,
            format!("accuracy {} outside [0, 1]", record.accuracy),
        ));
    }
    Ok(record)
}

impl ScoreStore for CsvScoreStore {
    fn append(&mut self, record: &ScoreRecord) -> Result<RecordId, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let needs_header = self.is_empty_or_missing();
        let id = RecordId(self.row_count()?);

        let unterminated = self.lacks_final_newline()?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        if unterminated {
            file.write_all(b"\n")?;
        }
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        if let Ok(mut file) = writer.into_inner() {
            file.flush()?;
        }

        debug!(path = %self.path.display(), %id, score = record.score, "appended score record");
        Ok(id)
    }

    fn read_all(&self) -> Result<Vec<(RecordId, ScoreRecord)>, StoreError> {
        if self.is_empty_or_missing() {
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let mut records = Vec::new();
        for (idx, raw) in reader.records().enumerate() {
            let row = idx + 1;
            let raw = match raw {
                Ok(raw) => raw,
                Err(e) => {
                    let err = match e.kind() {
                        ErrorKind::UnequalLengths { .. } | ErrorKind::Utf8 { .. } => {
                            malformed(row, &e)
                        }
                        _ => StoreError::Csv(e),
                    };
                    warn!(path = %self.path.display(), row, error = %err, "score store read failed");
                    return Err(err);
                }
            };
            match parse_row(row, &raw, &headers) {
                Ok(record) => records.push((RecordId(idx), record)),
                Err(err) => {
                    warn!(path = %self.path.display(), row, error = %err, "score store read failed");
                    return Err(err);
                }
            }
        }

        Ok(records)
    }
}

/// In-memory store, used in tests and when persistence is switched off
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn append(&mut self, record: &ScoreRecord) -> Result<RecordId, StoreError> {
        self.records.push(record.clone());
        Ok(RecordId(self.records.len() - 1))
    }

    fn read_all(&self) -> Result<Vec<(RecordId, ScoreRecord)>, StoreError> {
        Ok(self
            .records
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, r)| (RecordId(i), r))
            .collect())
    }
}
