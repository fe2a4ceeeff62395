//! Log device: read/write entry points over the record store
//!
//! Writers append bytes; every terminator closes a record. Readers see the
//! committed records as one continuous byte stream and address it by a
//! global position, which they keep themselves.
//!
//! # Thread Safety
//!
//! `LogDevice` is shared via `Arc` between any number of tasks. Every
//! operation holds the device lock for its whole duration, so operations
//! are totally ordered by lock acquisition. Waiting for the lock can be
//! cut short with an `Interrupt`, in which case the operation returns
//! `LogError::Interrupted` without having changed anything.

use std::fmt;

use tokio::sync::MutexGuard;
use tracing::{debug, trace};

use crate::accumulator::AccumulatingWriter;
use crate::config::LogConfig;
use crate::error::Result;
use crate::guard::{ExclusionGuard, Interrupt};
use crate::record::Record;
use crate::store::RecordStore;
use crate::transfer::{CopyIn, CopyOut};

/// Everything behind the device lock
struct DeviceState {
    store: RecordStore,
    writer: AccumulatingWriter,
}

/// Read-only view of the device state
///
/// Holds the device lock until dropped. Every other operation on the
/// device waits meanwhile.
pub struct DeviceGuard<'a>(MutexGuard<'a, DeviceState>);

impl DeviceGuard<'_> {
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.0.store
    }

    #[must_use]
    pub fn writer(&self) -> &AccumulatingWriter {
        &self.0.writer
    }
}

pub struct LogDevice {
    state: ExclusionGuard<DeviceState>,
    config: LogConfig,
}

impl LogDevice {
    /// Create an empty device
    ///
    /// # Errors
    ///
    /// `LogError::InvalidConfig` if `config` does not validate.
    pub fn new(config: LogConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: ExclusionGuard::new(DeviceState {
                store: RecordStore::new(config.capacity)?,
                writer: AccumulatingWriter::new(config.terminator),
            }),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Lock the device for inspection
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn lock(&self, interrupt: &Interrupt) -> Result<DeviceGuard<'_>> {
        Ok(DeviceGuard(self.state.acquire(interrupt).await?))
    }

    /// Read up to `len` bytes of the stream starting at `*position`
    ///
    /// Copies into `dst` across record boundaries and advances `*position`
    /// by the number of bytes actually transferred, which is returned.
    ///
    /// Returns:
    /// - `Ok(0)` at or past the end of the stream; `*position` is untouched
    /// - `Ok(n)` with `n <= len`; `n` can be smaller than asked if `dst`
    ///   stops accepting bytes
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn read<D: CopyOut + ?Sized>(
        &self,
        position: &mut usize,
        len: usize,
        dst: &mut D,
        interrupt: &Interrupt,
    ) -> Result<usize> {
        let state = self.state.acquire(interrupt).await?;
        let total = state.store.total_size();
        trace!(pos = *position, len, total, "read");

        if *position >= total {
            return Ok(0);
        }

        let mut remaining = len.min(total - *position);
        let mut transferred = 0;
        while remaining > 0 {
            let Some((record, local)) = state.store.find_by_offset(*position) else {
                break;
            };
            let chunk_len = remaining.min(record.len() - local);
            let chunk = &record[local..local + chunk_len];

            let copied = dst.copy_out(chunk).min(chunk_len);
            if copied == 0 {
                debug!(pos = *position, "destination accepted no bytes, stopping read");
                break;
            }
            if copied < chunk_len {
                trace!(pos = *position, asked = chunk_len, copied, "short copy, retrying rest");
            }

            *position += copied;
            transferred += copied;
            remaining -= copied;
        }

        Ok(transferred)
    }

    /// Append bytes from `src`, committing a record at the terminator
    ///
    /// Returns the number of bytes accepted. It is smaller than what `src`
    /// offered only if the copy from `src` came up short.
    ///
    /// # Errors
    ///
    /// - `LogError::Interrupted` if interrupted while waiting for the lock
    /// - `LogError::OutOfMemory` if the pending record cannot grow
    /// - `LogError::TrailingAfterTerminator` if the data continues past a
    ///   terminator
    ///
    /// Committed records are never touched by a failed write.
    pub async fn write<S: CopyIn + ?Sized>(
        &self,
        src: &mut S,
        interrupt: &Interrupt,
    ) -> Result<usize> {
        let mut state = self.state.acquire(interrupt).await?;
        trace!(len = src.remaining(), pending = state.writer.pending_len(), "write");

        let accepted = state.writer.append_from(src)?;

        if let Some(record) = state.writer.try_commit() {
            debug!(len = record.len(), "committing record");
            // Dropping the evicted record releases it
            drop(state.store.add_record(record));
        }

        Ok(accepted)
    }

    /// Convenience wrapper over `write` for a byte slice
    ///
    /// # Errors
    ///
    /// Same as `write`.
    pub async fn write_bytes(&self, data: &[u8], interrupt: &Interrupt) -> Result<usize> {
        let mut src = data;
        self.write(&mut src, interrupt).await
    }

    /// Logical size of the stream (committed bytes only)
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn total_size(&self, interrupt: &Interrupt) -> Result<usize> {
        Ok(self.state.acquire(interrupt).await?.store.total_size())
    }

    /// Number of committed records
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn record_count(&self, interrupt: &Interrupt) -> Result<usize> {
        Ok(self.state.acquire(interrupt).await?.store.len())
    }

    /// Bytes written but not yet terminated
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn pending_len(&self, interrupt: &Interrupt) -> Result<usize> {
        Ok(self.state.acquire(interrupt).await?.writer.pending_len())
    }

    /// Copy of the committed records, oldest first
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn records(&self, interrupt: &Interrupt) -> Result<Vec<Record>> {
        let state = self.state.acquire(interrupt).await?;
        Ok(state.store.iter().cloned().collect())
    }

    /// Drop all committed records
    ///
    /// The pending record is kept.
    ///
    /// # Errors
    ///
    /// `LogError::Interrupted` if interrupted while waiting for the lock.
    pub async fn reset(&self, interrupt: &Interrupt) -> Result<()> {
        let mut state = self.state.acquire(interrupt).await?;
        debug!(records = state.store.len(), "resetting record store");
        state.store.reset();
        Ok(())
    }
}

impl fmt::Debug for LogDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_acquire() {
            Some(state) => write!(
                f,
                "LogDevice({:?}, pending={})",
                state.store,
                state.writer.pending_len()
            ),
            None => write!(f, "LogDevice(<locked>, config={:?})", self.config),
        }
    }
}
