//! Syscall-backed socket operations
//!
//! ## Tips
//!
//! + Blocking behavior is inherited from the descriptor, the buffer never
//!   configures it
//! + On any error the cursors are left exactly as they were, the platform
//!   errno is carried by the returned `io::Error`
//!

use std::io;
use std::os::unix::io::RawFd;

use libc;

use buffer::Buffer;


/// Stack scratch used as overflow capacity by the scatter read.
const SCRATCH_SIZE: usize = 65535;

impl Buffer {
    /// Reads from `fd` with a single vectored syscall across two regions:
    /// the buffer's writable tail and a stack scratch area. A burst larger
    /// than the current free space is absorbed in one syscall, the overflow
    /// is appended afterwards through the normal growth-or-compaction path.
    pub fn read_fd(&mut self, fd: RawFd) -> io::Result<usize> {
        let mut scratch = [0u8; SCRATCH_SIZE];
        let writable = self.writable_bytes();

        let iov = [
            libc::iovec {
                iov_base: self.begin_write().as_mut_ptr() as *mut libc::c_void,
                iov_len: writable,
            },
            libc::iovec {
                iov_base: scratch.as_mut_ptr() as *mut libc::c_void,
                iov_len: SCRATCH_SIZE,
            },
        ];

        let res = unsafe { libc::readv(fd, iov.as_ptr(), 2) };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }

        let n = res as usize;
        if n <= writable {
            self.has_written(n);
        } else {
            // The tail is full, the rest landed in the scratch region.
            self.has_written(writable);
            self.append(&scratch[..n - writable]);
        }
        Ok(n)
    }

    /// Writes the unread span to `fd` in one syscall and advances the read
    /// cursor by the count actually written. Looping on short writes is the
    /// caller's concern.
    pub fn write_fd(&mut self, fd: RawFd) -> io::Result<usize> {
        let readable = self.readable_bytes();
        let res = unsafe {
            libc::write(fd, self.peek().as_ptr() as *const libc::c_void, readable)
        };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }

        let n = res as usize;
        self.retrieve(n);
        Ok(n)
    }
}
