use core::fmt;

use crate::content_format::ContentFormat;

/// A CoAP response code: a 3-bit class and 5-bit detail, rendered `c.dd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
  /// The code class (2 = success, 4 = client error, 5 = server error)
  pub class: u8,
  /// The code detail
  pub detail: u8,
}

impl Code {
  /// Create a new response code
  pub const fn new(class: u8, detail: u8) -> Self {
    Self { class, detail }
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{:02}", self.class, self.detail)
  }
}

/// The response codes the engine emits
pub mod code {
  use super::Code;

  macro_rules! code {
    (#[$doc:meta] $name:ident = $c:literal . $d:literal) => {
      #[$doc]
      #[allow(clippy::zero_prefixed_literal)]
      pub const $name: Code = Code::new($c, $d);
    };
  }

  // 2.xx
  code!(#[doc = "2.01 Created"]
        CREATED = 2 . 01);
  code!(#[doc = "2.02 Deleted"]
        DELETED = 2 . 02);
  code!(#[doc = "2.04 Changed"]
        CHANGED = 2 . 04);
  code!(#[doc = "2.05 Content"]
        CONTENT = 2 . 05);

  // 4.xx
  code!(#[doc = "4.04 Not Found"]
        NOT_FOUND = 4 . 04);
  code!(#[doc = "4.05 Method Not Allowed"]
        METHOD_NOT_ALLOWED = 4 . 05);
  code!(#[doc = "4.06 Not Acceptable"]
        NOT_ACCEPTABLE = 4 . 06);

  // 5.xx
  code!(#[doc = "5.00 Internal Server Error"]
        INTERNAL_SERVER_ERROR = 5 . 00);
}

/// An outgoing CoAP response, as filled in by the engine.
///
/// The transport owns the message; the engine only sets the code, the
/// Content-Format option and the payload. A handler that sets none of these
/// leaves the transport's defaults in place.
pub trait Resp {
  /// Set the response code
  fn set_code(&mut self, code: Code);

  /// Set the Content-Format option
  fn set_content_format(&mut self, format: ContentFormat);

  /// Set the payload bytes
  fn set_payload(&mut self, payload: &[u8]);
}
