/// Content-Format
///
/// The LWM2M-relevant subset of the CoAP Content-Format registry, plus the
/// OMA-TLV binary format (IANA 11542).
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentFormat {
  /// `text/plain; charset=utf-8`
  ///
  /// LWM2M's historical pre-IANA plain-text format is folded into this
  /// variant; the engine treats the two identically.
  Text,
  /// `application/link-format`
  LinkFormat,
  /// `application/octet-stream`
  OctetStream,
  /// `application/json`
  Json,
  /// `application/vnd.oma.lwm2m+tlv`
  Tlv,
  /// Another content format
  Other(u16),
}

impl ContentFormat {
  /// Convert this content format to the CoAP byte value
  pub fn bytes(&self) -> [u8; 2] {
    u16::from(self).to_be_bytes()
  }
}

impl<'a> From<&'a ContentFormat> for u16 {
  fn from(f: &'a ContentFormat) -> Self {
    use ContentFormat::*;
    match *f {
      | Text => 0,
      | LinkFormat => 40,
      | OctetStream => 42,
      | Json => 50,
      | Tlv => 11542,
      | Other(n) => n,
    }
  }
}

impl From<u16> for ContentFormat {
  fn from(n: u16) -> Self {
    use ContentFormat::*;
    match n {
      | 0 => Text,
      | 40 => LinkFormat,
      | 42 => OctetStream,
      | 50 => Json,
      | 11542 => Tlv,
      | n => Other(n),
    }
  }
}

impl<'a> IntoIterator for &'a ContentFormat {
  type Item = u8;

  type IntoIter = <[u8; 2] as IntoIterator>::IntoIter;

  fn into_iter(self) -> Self::IntoIter {
    self.bytes().into_iter()
  }
}
