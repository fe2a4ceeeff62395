//! Open handle on a log device
//!
//! Each handle keeps its own read position, like an open file. Writes
//! always append and do not move the read position.

use std::fmt;
use std::sync::Arc;

use embedded_io_async::{ErrorType, Read, Write};

use crate::device::LogDevice;
use crate::error::LogError;
use crate::guard::Interrupt;

pub struct LogFile {
    device: Arc<LogDevice>,
    pos: usize,
    interrupt: Interrupt,
}

impl LogFile {
    /// Open a handle positioned at the start of the stream
    #[must_use]
    pub fn open(device: Arc<LogDevice>) -> Self {
        Self::with_interrupt(device, Interrupt::new())
    }

    /// Open a handle whose lock waits are cut short by `interrupt`
    #[must_use]
    pub fn with_interrupt(device: Arc<LogDevice>, interrupt: Interrupt) -> Self {
        Self {
            device,
            pos: 0,
            interrupt,
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read position. Positions past the end read as end of stream.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    #[must_use]
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    #[must_use]
    pub fn device(&self) -> &Arc<LogDevice> {
        &self.device
    }
}

impl ErrorType for LogFile {
    type Error = LogError;
}

impl Read for LogFile {
    /// Returns `Ok(0)` at the end of the stream
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let len = buf.len();
        let mut dst = buf;
        self.device
            .read(&mut self.pos, len, &mut dst, &self.interrupt)
            .await
    }
}

impl Write for LogFile {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.device.write_bytes(buf, &self.interrupt).await
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl fmt::Debug for LogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogFile(pos={}, {:?})", self.pos, self.interrupt)
    }
}
