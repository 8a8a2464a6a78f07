//! # Framed Append-Only Log
//!
//! Persistence primitive for ledger pages and aggregate digests.
//!
//! ## Frame Format
//!
//! ```text
//! [len: u32 LE][crc32: u32 LE][bincode record: len bytes]
//! ```
//!
//! ## Guarantees
//!
//! - Records are only ever appended; existing bytes are never rewritten.
//! - A failed append truncates the file back to its previous length, so the
//!   log is exactly as it was before the call.
//! - On open, an incomplete *tail* frame (short header or short body) is a
//!   torn write from a crash and is discarded.
//! - A complete frame that does not decode is `StoreError::Corrupted`, even
//!   at the tail. Committed bytes are never truncated away.
//! - A complete frame whose checksum mismatches but still decodes is loaded
//!   with a warning. Judging the record is the integrity verifier's job.

use crate::errors::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Bytes of frame header (length + checksum).
pub const FRAME_HEADER_LEN: usize = 8;

/// Abstract interface for an append-only record log.
///
/// Production: `FileAppendLog`
/// Testing: `MemoryAppendLog`
pub trait AppendLog<T>: Send + Sync {
    /// Read every committed record in append order.
    fn read_all(&self) -> Result<Vec<T>, StoreError>;

    /// Durably append one record.
    ///
    /// Either the record is fully persisted or the log is unchanged.
    fn append(&mut self, record: &T) -> Result<(), StoreError>;

    /// Number of committed records.
    fn record_count(&self) -> u64;
}

/// Result of scanning raw log bytes.
struct ScanOutcome<T> {
    records: Vec<T>,
    valid_len: u64,
    torn_tail: bool,
}

fn encode_frame<T: Serialize>(record: &T) -> Result<Vec<u8>, StoreError> {
    let body = bincode::serialize(record)?;
    let len = u32::try_from(body.len())
        .map_err(|_| StoreError::Serialization(format!("record too large: {} bytes", body.len())))?;

    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

fn scan_frames<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<ScanOutcome<T>, StoreError> {
    let mut records = Vec::new();
    let mut cursor = 0usize;
    let mut frame = 0u64;

    while cursor < bytes.len() {
        if bytes.len() - cursor < FRAME_HEADER_LEN {
            return Ok(ScanOutcome {
                records,
                valid_len: cursor as u64,
                torn_tail: true,
            });
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[cursor..cursor + 4]);
        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&bytes[cursor + 4..cursor + 8]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        let expected_crc = u32::from_le_bytes(crc_bytes);

        let start = cursor + FRAME_HEADER_LEN;
        let end = match start.checked_add(len) {
            Some(end) if end <= bytes.len() => end,
            _ => {
                return Ok(ScanOutcome {
                    records,
                    valid_len: cursor as u64,
                    torn_tail: true,
                })
            }
        };

        let body = &bytes[start..end];
        match bincode::deserialize::<T>(body) {
            Ok(record) => {
                if crc32fast::hash(body) != expected_crc {
                    tracing::warn!(
                        "[log] ⚠️ Frame {} in {} fails its checksum; loading it for audit",
                        frame,
                        path.display()
                    );
                }
                records.push(record);
            }
            Err(e) => {
                return Err(StoreError::Corrupted {
                    frame,
                    offset: cursor as u64,
                    reason: e.to_string(),
                })
            }
        }

        cursor = end;
        frame += 1;
    }

    Ok(ScanOutcome {
        records,
        valid_len: cursor as u64,
        torn_tail: false,
    })
}

/// File-backed append-only log.
pub struct FileAppendLog<T> {
    path: PathBuf,
    file: File,
    byte_len: u64,
    records: u64,
    _record: PhantomData<fn() -> T>,
}

impl<T> FileAppendLog<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open (or create) the log at `path`, discarding a torn tail frame.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;

        let bytes = Self::read_bytes(&path)?;
        let outcome = scan_frames::<T>(&bytes, &path)?;

        if outcome.torn_tail {
            tracing::warn!(
                "[log] ✂️ Discarding torn tail of {} ({} -> {} bytes)",
                path.display(),
                bytes.len(),
                outcome.valid_len
            );
            file.set_len(outcome.valid_len)?;
            file.sync_all()?;
        }

        tracing::debug!(
            "[log] Opened {} with {} records",
            path.display(),
            outcome.records.len()
        );

        Ok(Self {
            path,
            file,
            byte_len: outcome.valid_len,
            records: outcome.records.len() as u64,
            _record: PhantomData,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_bytes(path: &Path) -> Result<Vec<u8>, StoreError> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl<T> AppendLog<T> for FileAppendLog<T>
where
    T: Serialize + DeserializeOwned,
{
    fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let bytes = Self::read_bytes(&self.path)?;
        let valid = (self.byte_len as usize).min(bytes.len());
        Ok(scan_frames::<T>(&bytes[..valid], &self.path)?.records)
    }

    fn append(&mut self, record: &T) -> Result<(), StoreError> {
        let frame = encode_frame(record)?;

        let written = self
            .file
            .write_all(&frame)
            .and_then(|_| self.file.sync_data());

        if let Err(e) = written {
            // Roll back whatever part of the frame reached the file.
            if let Err(rollback) = self.file.set_len(self.byte_len) {
                tracing::error!(
                    "[log] Rollback of {} failed: {}",
                    self.path.display(),
                    rollback
                );
            }
            return Err(StoreError::Io(e));
        }

        self.byte_len += frame.len() as u64;
        self.records += 1;
        Ok(())
    }

    fn record_count(&self) -> u64 {
        self.records
    }
}

/// In-memory log for unit tests, with failure injection.
pub struct MemoryAppendLog<T> {
    records: Vec<T>,
    fail_next: bool,
}

impl<T> Default for MemoryAppendLog<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            fail_next: false,
        }
    }
}

impl<T> MemoryAppendLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append` fail without storing anything.
    pub fn fail_next_append(&mut self) {
        self.fail_next = true;
    }
}

impl<T> AppendLog<T> for MemoryAppendLog<T>
where
    T: Clone + Send + Sync,
{
    fn read_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.records.clone())
    }

    fn append(&mut self, record: &T) -> Result<(), StoreError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(StoreError::Injected("append rejected".to_string()));
        }
        self.records.push(record.clone());
        Ok(())
    }

    fn record_count(&self) -> u64 {
        self.records.len() as u64
    }
}
