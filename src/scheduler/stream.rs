// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compact binary stream used between cluster nodes for scheduler action requests
// role: scheduler/wire
// inputs: any io::Read / io::Write
// outputs: variable-length integers and length-prefixed UTF-8 strings
// invariants: vints are little-endian base-128 and at most 5 bytes; string lengths count bytes, not chars
// errors: VIntOverflow, InvalidUtf8, Io (including unexpected end of stream)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{Read, Write};

use crate::errors::CodecError;

const VINT_MAX_BYTES: usize = 5;

pub struct StreamOutput<W: Write> {
  inner: W,
}

impl<W: Write> StreamOutput<W> {
  pub fn new(inner: W) -> Self {
    Self { inner }
  }

  pub fn write_vint(&mut self, mut value: u32) -> Result<(), CodecError> {
    while value >= 0x80 {
      self.inner.write_all(&[(value as u8 & 0x7f) | 0x80])?;
      value >>= 7;
    }
    self.inner.write_all(&[value as u8])?;

    Ok(())
  }

  pub fn write_string(&mut self, value: &str) -> Result<(), CodecError> {
    let len = u32::try_from(value.len()).map_err(|_| CodecError::VIntOverflow)?;
    self.write_vint(len)?;
    self.inner.write_all(value.as_bytes())?;

    Ok(())
  }

  pub fn into_inner(self) -> W {
    self.inner
  }
}

pub struct StreamInput<R: Read> {
  inner: R,
}

impl<R: Read> StreamInput<R> {
  pub fn new(inner: R) -> Self {
    Self { inner }
  }

  pub fn read_vint(&mut self) -> Result<u32, CodecError> {
    let mut value: u32 = 0;

    for i in 0..VINT_MAX_BYTES {
      let mut byte = [0u8; 1];
      self.inner.read_exact(&mut byte)?;
      let b = byte[0];

      // The fifth byte may only carry the top 4 bits.
      if i == VINT_MAX_BYTES - 1 && b & 0xf0 != 0 {
        return Err(CodecError::VIntOverflow);
      }
      value |= u32::from(b & 0x7f) << (7 * i);

      if b & 0x80 == 0 {
        return Ok(value);
      }
    }

    Err(CodecError::VIntOverflow)
  }

  pub fn read_string(&mut self) -> Result<String, CodecError> {
    let len = self.read_vint()? as usize;
    let mut buf = Vec::new();
    (&mut self.inner).take(len as u64).read_to_end(&mut buf)?;

    if buf.len() != len {
      return Err(CodecError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("string declared {len} bytes, stream had {}", buf.len()),
      )));
    }

    String::from_utf8(buf).map_err(|_| CodecError::InvalidUtf8)
  }

  /// Bytes left unread; used to reject trailing garbage after a request.
  pub fn remaining(&mut self) -> Result<usize, CodecError> {
    let mut rest = Vec::new();
    self.inner.read_to_end(&mut rest)?;

    Ok(rest.len())
  }
}

/// Types that can write themselves to the binary stream.
pub trait Writeable {
  fn write_to<W: Write>(&self, out: &mut StreamOutput<W>) -> Result<(), CodecError>;
}
