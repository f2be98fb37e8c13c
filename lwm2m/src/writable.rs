use core::fmt;
use core::ops::{Deref, DerefMut};

use tinyvec::ArrayVec;

/// A writeable byte buffer
///
/// (allows using `write!` without allocations)
#[derive(Clone, Copy, Debug)]
pub(crate) struct Writable<A: tinyvec::Array<Item = u8>>(ArrayVec<A>);

// not derived: the derive would demand `A: Default`, which large arrays
// don't implement
impl<A: tinyvec::Array<Item = u8>> Default for Writable<A> {
  fn default() -> Self {
    Self(ArrayVec::default())
  }
}

impl<A: tinyvec::Array<Item = u8>> Writable<A> {
  /// Convert the buffer to a string slice
  pub(crate) fn as_str(&self) -> &str {
    core::str::from_utf8(&self.0).unwrap_or("")
  }

  pub(crate) fn len(&self) -> usize {
    self.0.len()
  }

  /// Drop everything written after the first `len` bytes
  pub(crate) fn rewind(&mut self, len: usize) {
    self.0.truncate(len);
  }

  /// Append as much of `s` as fits
  pub(crate) fn push_trunc(&mut self, s: &str) {
    let room = A::CAPACITY - self.0.len();
    self.0.extend_from_slice(&s.as_bytes()[..s.len().min(room)]);
  }
}

impl<A: tinyvec::Array<Item = u8>> Deref for Writable<A> {
  type Target = ArrayVec<A>;

  fn deref(&self) -> &ArrayVec<A> {
    &self.0
  }
}

impl<A: tinyvec::Array<Item = u8>> DerefMut for Writable<A> {
  fn deref_mut(&mut self) -> &mut ArrayVec<A> {
    &mut self.0
  }
}

impl<A: tinyvec::Array<Item = u8>> fmt::Write for Writable<A> {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    if A::CAPACITY < self.0.len() + s.len() {
      Err(fmt::Error)
    } else {
      self.0.extend_from_slice(s.as_bytes());
      Ok(())
    }
  }
}

/// `fmt::Write` over a caller-supplied byte buffer.
///
/// Overflowing the buffer poisons the writer and [`SliceWriter::finish`]
/// yields 0, the "could not serialize" convention the dispatcher turns
/// into 5.00.
pub(crate) struct SliceWriter<'a> {
  buf: &'a mut [u8],
  len: usize,
  overflow: bool,
}

impl<'a> SliceWriter<'a> {
  pub(crate) fn new(buf: &'a mut [u8]) -> Self {
    Self { buf,
           len: 0,
           overflow: false }
  }

  /// The number of bytes written, or 0 if the buffer overflowed
  pub(crate) fn finish(self) -> usize {
    if self.overflow {
      0
    } else {
      self.len
    }
  }
}

impl<'a> fmt::Write for SliceWriter<'a> {
  fn write_str(&mut self, s: &str) -> fmt::Result {
    if self.overflow || self.buf.len() - self.len < s.len() {
      self.overflow = true;
      return Err(fmt::Error);
    }
    self.buf[self.len..self.len + s.len()].copy_from_slice(s.as_bytes());
    self.len += s.len();
    Ok(())
  }
}
