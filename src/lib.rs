#[cfg(unix)]
extern crate libc;

pub mod buffer;

#[cfg(unix)]
pub mod fd;

pub use buffer::Buffer;

#[cfg(test)]
#[macro_use]
extern crate matches;

#[cfg(test)]
extern crate mio;

#[cfg(test)]
extern crate rand;
