//! # Response Buffers
//!
//! Native entry points that answer with text take a caller-allocated buffer
//! plus an in/out size: the size starts at the buffer capacity and the native
//! side overwrites it with the length of its answer. When the answer does not
//! fit, the native side writes a truncated prefix and reports the length it
//! needed.

use std::os::raw::{c_char, c_int};

use crate::types::encoding::TextEncoding;

/// Fixed-capacity output buffer with its in/out size indicator
#[derive(Debug, Clone)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    size: c_int,
}

impl ResponseBuffer {
    /// Allocate a zero-filled buffer whose size indicator starts at `capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            size: c_int::try_from(capacity).unwrap_or(c_int::MAX),
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn as_mut_ptr(&mut self) -> *mut c_char {
        self.data.as_mut_ptr().cast()
    }

    pub fn size_mut(&mut self) -> &mut c_int {
        &mut self.size
    }

    /// Length reported by the native side (zero if it reported a negative)
    pub fn reported_len(&self) -> usize {
        usize::try_from(self.size).unwrap_or(0)
    }

    /// The answer did not fit and only a prefix was written
    pub fn is_truncated(&self) -> bool {
        self.reported_len() > self.capacity()
    }

    /// Valid bytes: the reported length clamped to the capacity, cut at the
    /// first NUL inside that prefix.
    pub fn bytes(&self) -> &[u8] {
        let written = &self.data[..self.reported_len().min(self.capacity())];
        match written.iter().position(|&b| b == 0) {
            Some(nul) => &written[..nul],
            None => written,
        }
    }

    pub fn decode(&self, encoding: TextEncoding) -> String {
        encoding.decode(self.bytes())
    }

    /// Fill the buffer the way the native component does: copy as much of
    /// `answer` as fits, NUL-terminate when there is room, and report the
    /// full length of `answer`.
    pub fn write(&mut self, answer: &[u8]) {
        let copied = answer.len().min(self.capacity());
        self.data[..copied].copy_from_slice(&answer[..copied]);
        if copied < self.capacity() {
            self.data[copied] = 0;
        }
        self.size = c_int::try_from(answer.len()).unwrap_or(c_int::MAX);
    }

    /// Overwrite the reported size without touching the data
    pub fn set_reported_len(&mut self, len: c_int) {
        self.size = len;
    }
}
