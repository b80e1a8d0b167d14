//! Staging buffer
//!
//! ## Tips
//!
//! + A buffer instance is owned by a single connection context, there is no
//!   internal locking
//! + Consumed space at the front is reclaimed by compaction before the
//!   storage is ever grown
//! + `peek` and `begin_write` views are valid only until the next mutating
//!   call
//!

use std::io::{self, Read, Write};


/// Initial capacity used by `new` and `Default`.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Growable byte buffer with a read cursor and a write cursor over one
/// contiguous backing store.
///
/// Invariant: `0 <= read_pos <= write_pos <= capacity` holds before and
/// after every operation.
pub struct Buffer {
    storage: Vec<u8>,
    read_pos: usize,
    write_pos: usize,
}

impl Buffer {
    pub fn new() -> Buffer {
        Buffer::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Buffer {
        Buffer {
            storage: vec![0; capacity],
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Bytes available for consumption.
    pub fn readable_bytes(&self) -> usize {
        self.write_pos - self.read_pos
    }

    /// Bytes available for appending without growth.
    pub fn writable_bytes(&self) -> usize {
        self.storage.len() - self.write_pos
    }

    /// Bytes already consumed and free to be reclaimed.
    pub fn prependable_bytes(&self) -> usize {
        self.read_pos
    }

    /// Total size of the backing store.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// View of the unread bytes, does not advance the read cursor.
    pub fn peek(&self) -> &[u8] {
        &self.storage[self.read_pos..self.write_pos]
    }

    /// Writable region starting at the write cursor.
    pub fn begin_write(&mut self) -> &mut [u8] {
        let wp = self.write_pos;
        &mut self.storage[wp..]
    }

    pub fn begin_write_const(&self) -> &[u8] {
        &self.storage[self.write_pos..]
    }

    /// Advances the write cursor after an external write into `begin_write`.
    pub fn has_written(&mut self, len: usize) {
        assert!(len <= self.writable_bytes());
        self.write_pos += len;
    }

    /// Consumes `len` leading bytes.
    ///
    /// Panics if `len` exceeds `readable_bytes`, consuming more than is
    /// readable would corrupt the cursors.
    pub fn retrieve(&mut self, len: usize) {
        assert!(len <= self.readable_bytes());
        self.read_pos += len;
    }

    /// Consumes up to `end`, a pointer into the readable region as returned
    /// by `peek`. Used to consume through a located delimiter.
    pub fn retrieve_until(&mut self, end: *const u8) {
        let start = self.peek().as_ptr();
        assert!(start as usize <= end as usize);
        let len = end as usize - start as usize;
        self.retrieve(len);
    }

    /// Resets both cursors to zero and scrubs the storage, restoring the
    /// buffer to its just-constructed state.
    pub fn retrieve_all(&mut self) {
        for b in self.storage.iter_mut() {
            *b = 0;
        }
        self.read_pos = 0;
        self.write_pos = 0;
    }

    /// Captures the unread bytes as an owned vector, then `retrieve_all`.
    pub fn retrieve_all_to_vec(&mut self) -> Vec<u8> {
        let v = self.peek().to_vec();
        self.retrieve_all();
        v
    }

    /// Captures the unread bytes as a string (lossy), then `retrieve_all`.
    pub fn retrieve_all_to_string(&mut self) -> String {
        let v = self.retrieve_all_to_vec();
        String::from_utf8_lossy(&v).into_owned()
    }

    /// Makes room for at least `len` more bytes, reclaiming consumed space
    /// before growing the storage.
    pub fn ensure_writeable(&mut self, len: usize) {
        if self.writable_bytes() < len {
            self.make_space(len);
        }
        debug_assert!(self.writable_bytes() >= len);
    }

    /// Appends `data`, growing or compacting as needed.
    pub fn append(&mut self, data: &[u8]) {
        self.ensure_writeable(data.len());
        let wp = self.write_pos;
        self.storage[wp..wp + data.len()].copy_from_slice(data);
        self.has_written(data.len());
    }

    /// Appends another buffer's unread span, not its full capacity.
    pub fn append_buffer(&mut self, other: &Buffer) {
        self.append(other.peek());
    }

    /// Single read from `r` into the writable tail. Portable counterpart of
    /// the vectored `read_fd`, at the cost of growing up front when the
    /// tail is empty.
    pub fn read_from<R: Read>(&mut self, r: &mut R) -> io::Result<usize> {
        if self.writable_bytes() == 0 {
            self.ensure_writeable(DEFAULT_CAPACITY);
        }
        let n = r.read(self.begin_write())?;
        self.has_written(n);
        Ok(n)
    }

    /// Single write of the unread span to `w`. Advances the read cursor by
    /// the count actually written, looping on short writes is the caller's
    /// concern.
    pub fn write_to<W: Write>(&mut self, w: &mut W) -> io::Result<usize> {
        let n = w.write(self.peek())?;
        self.retrieve(n);
        Ok(n)
    }

    fn make_space(&mut self, len: usize) {
        if self.writable_bytes() + self.prependable_bytes() < len {
            let new_len = self.write_pos + len + 1;
            self.storage.resize(new_len, 0);
        } else {
            // Reclaim the consumed prefix. Source and destination ranges may
            // intersect, copy_within tolerates the overlap.
            let readable = self.readable_bytes();
            let (rp, wp) = (self.read_pos, self.write_pos);
            self.storage.copy_within(rp..wp, 0);
            self.read_pos = 0;
            self.write_pos = readable;
            debug_assert!(readable == self.readable_bytes());
        }
    }
}

impl Default for Buffer {
    fn default() -> Buffer {
        Buffer::new()
    }
}

impl Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.readable_bytes());
        buf[..n].copy_from_slice(&self.peek()[..n]);
        self.retrieve(n);
        Ok(n)
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
