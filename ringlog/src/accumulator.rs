//! Pending record under construction
//!
//! A logical record may arrive in several writes. Bytes accumulate here
//! until the terminator shows up; then the whole pending buffer moves out
//! as one `Record`.

use tracing::trace;

use crate::error::{LogError, Result};
use crate::record::Record;
use crate::transfer::CopyIn;

#[derive(Debug)]
pub struct AccumulatingWriter {
    pending: Vec<u8>,
    terminator: u8,
}

impl AccumulatingWriter {
    #[must_use]
    pub fn new(terminator: u8) -> Self {
        Self {
            pending: Vec::new(),
            terminator,
        }
    }

    #[must_use]
    pub fn terminator(&self) -> u8 {
        self.terminator
    }

    /// Bytes received for the record under construction
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Append `bytes` to the pending record
    ///
    /// # Errors
    ///
    /// See `append_from`.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize> {
        let mut src = bytes;
        self.append_from(&mut src)
    }

    /// Grow the pending record by what `src` offers and copy it in
    ///
    /// The copy may be short; only the bytes actually copied are kept and
    /// their count is returned.
    ///
    /// # Errors
    ///
    /// - `OutOfMemory` if the buffer cannot grow; nothing is changed.
    /// - `TrailingAfterTerminator` if the copied bytes continue past a
    ///   terminator; the copied bytes are dropped again. Also returned with
    ///   offset 0 when the pending record is already terminated and has not
    ///   been committed yet.
    pub fn append_from<S: CopyIn + ?Sized>(&mut self, src: &mut S) -> Result<usize> {
        let requested = src.remaining();
        if requested == 0 {
            return Ok(0);
        }
        if self.is_terminated() {
            return Err(LogError::TrailingAfterTerminator { offset: 0 });
        }

        self.pending
            .try_reserve(requested)
            .map_err(|_| LogError::OutOfMemory { requested })?;

        let old_len = self.pending.len();
        self.pending.resize(old_len + requested, 0);
        let copied = src.copy_in(&mut self.pending[old_len..]).min(requested);
        self.pending.truncate(old_len + copied);

        let fresh = &self.pending[old_len..];
        if let Some(offset) = fresh.iter().position(|&b| b == self.terminator) {
            if offset + 1 != fresh.len() {
                self.pending.truncate(old_len);
                return Err(LogError::TrailingAfterTerminator { offset });
            }
        }

        if copied < requested {
            trace!(requested, copied, "short copy into pending record");
        }
        Ok(copied)
    }

    /// Move the pending bytes out as a record if they are terminated
    pub fn try_commit(&mut self) -> Option<Record> {
        if !self.is_terminated() {
            return None;
        }
        Some(Record::new(std::mem::take(&mut self.pending)))
    }

    // A terminator can only ever be the last pending byte
    fn is_terminated(&self) -> bool {
        self.pending.last() == Some(&self.terminator)
    }
}
