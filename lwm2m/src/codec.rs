//! Content-format selection over the two value codecs.
//!
//! The request context carries one [`Reader`] and one [`Writer`]; the
//! dispatcher and resource callbacks go through them rather than naming a
//! codec directly, so a resource behaves the same whichever format the
//! request arrived in.

use crate::context::Context;
use crate::plain_text;
use crate::tlv;

/// Fraction bits of the system's fixed-point rationals.
pub const FLOATFIX_BITS: usize = 10;

/// A payload decoder, selected by the request's Content-Format.
///
/// Readers yield `(value, bytes consumed)`, `None` when the input is not a
/// valid encoding of the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reader {
  /// Decimal ASCII
  PlainText,
  /// OMA-TLV records
  Tlv,
}

impl Reader {
  /// Read an integer
  pub fn read_int(&self, buf: &[u8]) -> Option<(i32, usize)> {
    match self {
      | Self::PlainText => plain_text::read_int(buf),
      | Self::Tlv => tlv::read(buf).map(|(record, used)| (tlv::get_int32(&record), used)),
    }
  }

  /// Read a boolean
  pub fn read_boolean(&self, buf: &[u8]) -> Option<(bool, usize)> {
    match self {
      | Self::PlainText => plain_text::read_boolean(buf),
      | Self::Tlv => tlv::read(buf).map(|(record, used)| (tlv::get_int32(&record) != 0, used)),
    }
  }

  /// Read a fixed-point rational with [`FLOATFIX_BITS`] fraction bits
  pub fn read_float32fix(&self, buf: &[u8]) -> Option<(i32, usize)> {
    match self {
      | Self::PlainText => plain_text::read_float32fix(buf, FLOATFIX_BITS),
      | Self::Tlv => {
        tlv::read(buf).map(|(record, used)| (tlv::get_float32fix(&record, FLOATFIX_BITS), used))
      },
    }
  }
}

/// A payload encoder, selected by the response's Content-Format.
///
/// The TLV writer takes the record id from the context's `resource_id`.
/// Writers yield the bytes produced, 0 when the output did not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Writer {
  /// Decimal ASCII
  PlainText,
  /// OMA-TLV records
  Tlv,
}

impl Writer {
  /// Write an integer
  pub fn write_int(&self, ctx: &Context, buf: &mut [u8], value: i32) -> usize {
    match self {
      | Self::PlainText => plain_text::write_int(buf, value),
      | Self::Tlv => tlv::write_int32(ctx.resource_id, value, buf),
    }
  }

  /// Write a boolean
  pub fn write_boolean(&self, ctx: &Context, buf: &mut [u8], value: bool) -> usize {
    match self {
      | Self::PlainText => plain_text::write_boolean(buf, value),
      | Self::Tlv => tlv::write_int32(ctx.resource_id, i32::from(value), buf),
    }
  }

  /// Write a fixed-point rational with [`FLOATFIX_BITS`] fraction bits
  pub fn write_float32fix(&self, ctx: &Context, buf: &mut [u8], value: i32) -> usize {
    match self {
      | Self::PlainText => plain_text::write_float32fix(buf, value, FLOATFIX_BITS),
      | Self::Tlv => tlv::write_float32(ctx.resource_id, value, FLOATFIX_BITS, buf),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tlv_writer_tags_with_the_context_resource() {
    let ctx = Context::parse("3312/0/5850").unwrap();
    let mut buf = [0u8; 8];

    let n = Writer::Tlv.write_boolean(&ctx, &mut buf, true);
    let (record, _) = tlv::read(&buf[..n]).unwrap();
    assert_eq!(record.id, 5850);
    assert_eq!(tlv::get_int32(&record), 1);
  }

  #[test]
  fn readers_agree_across_formats() {
    let ctx = Context::parse("3/0/9").unwrap();
    let mut buf = [0u8; 16];

    let n = Writer::PlainText.write_int(&ctx, &mut buf, -42);
    assert_eq!(Reader::PlainText.read_int(&buf[..n]), Some((-42, n)));

    let n = Writer::Tlv.write_int(&ctx, &mut buf, -42);
    assert_eq!(Reader::Tlv.read_int(&buf[..n]), Some((-42, n)));
  }
}
