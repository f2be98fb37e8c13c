use crate::codec::{Reader, Writer};

/// The path contained something other than decimal segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadPath;

/// A request context: the addressed ids parsed from the URI path, the slot
/// indices resolved against the registry, and the codecs selected for the
/// exchange.
///
/// `depth` counts the path segments actually present: `3` for `/3/0/1`,
/// `1` for `/3`. Ids beyond the depth are 0 and meaningless.
///
/// ```
/// use lwm2m::Context;
///
/// let ctx = Context::parse("/3/0/1").unwrap();
/// assert_eq!((ctx.depth, ctx.object_id, ctx.object_instance_id, ctx.resource_id),
///            (3, 3, 0, 1));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Context {
  /// First path segment
  pub object_id: u16,
  /// Second path segment
  pub object_instance_id: u16,
  /// Third path segment
  pub resource_id: u16,
  /// Slot index of the resolved instance, when one was resolved from a
  /// currently-used slot
  pub object_instance_index: Option<usize>,
  /// Index of the resolved resource in the object's resource table
  pub resource_index: Option<usize>,
  /// Number of path segments present (0..=3)
  pub depth: u8,
  /// Decoder for request payloads
  pub reader: Reader,
  /// Encoder for response payloads
  pub writer: Writer,
}

impl Context {
  /// Parse a URI path of the shape `O`, `O/I` or `O/I/R` (leading `/`
  /// optional) into a context with default codecs: plain-text in, TLV out.
  ///
  /// The dispatcher overrides the codecs per request as the Content-Format
  /// demands.
  pub fn parse(path: &str) -> Result<Self, BadPath> {
    let mut bytes = path.as_bytes();
    if let Some((b'/', rest)) = bytes.split_first() {
      bytes = rest;
    }

    let mut ids = [0u16; 3];
    let mut depth = 0;
    for id in ids.iter_mut() {
      if !next_segment(&mut bytes, id)? {
        break;
      }
      depth += 1;
    }

    Ok(Context { object_id: ids[0],
                 object_instance_id: ids[1],
                 resource_id: ids[2],
                 object_instance_index: None,
                 resource_index: None,
                 depth,
                 reader: Reader::PlainText,
                 writer: Writer::Tlv })
  }
}

/// Consume one decimal segment and its terminating `/` (if any); `Ok(false)`
/// at end of input, `Err` on anything that is not a digit or slash.
///
/// Ids wrap at 16 bits, as the engine this is modelled on always did.
fn next_segment(bytes: &mut &[u8], value: &mut u16) -> Result<bool, BadPath> {
  if bytes.is_empty() {
    return Ok(false);
  }

  while let Some((&c, rest)) = bytes.split_first() {
    *bytes = rest;
    match c {
      | b'0'..=b'9' => *value = value.wrapping_mul(10).wrapping_add(u16::from(c - b'0')),
      | b'/' => return Ok(true),
      | _ => return Err(BadPath),
    }
  }
  Ok(true)
}
