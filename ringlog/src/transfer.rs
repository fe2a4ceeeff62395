//! Caller-side buffers for read and write
//!
//! Copies between the log and a caller buffer may move fewer bytes than
//! asked for. Both traits report how many bytes actually moved; a short
//! count is a normal outcome, not an error.

/// Destination of a read
pub trait CopyOut {
    /// Copy a prefix of `src` into the destination, return its length
    fn copy_out(&mut self, src: &[u8]) -> usize;
}

/// Source of a write
pub trait CopyIn {
    /// Bytes the source offers in total
    fn remaining(&self) -> usize;

    /// Fill a prefix of `dst` from the source, return its length
    fn copy_in(&mut self, dst: &mut [u8]) -> usize;
}

/// Fills the slice from the front and shrinks it, like `io::Write for &mut [u8]`
impl CopyOut for &mut [u8] {
    fn copy_out(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.len());
        let (head, tail) = std::mem::take(self).split_at_mut(n);
        head.copy_from_slice(&src[..n]);
        *self = tail;
        n
    }
}

impl CopyOut for Vec<u8> {
    fn copy_out(&mut self, src: &[u8]) -> usize {
        self.extend_from_slice(src);
        src.len()
    }
}

/// Consumes the slice from the front, like `io::Read for &[u8]`
impl CopyIn for &[u8] {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn copy_in(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.len());
        let (head, tail) = self.split_at(n);
        dst[..n].copy_from_slice(head);
        *self = tail;
        n
    }
}
