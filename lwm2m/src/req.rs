use crate::content_format::ContentFormat;

/// Request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  /// CoAP GET
  Get,
  /// CoAP PUT
  Put,
  /// CoAP POST
  Post,
  /// CoAP DELETE
  Delete,
}

/// An incoming CoAP request, as delivered by the transport.
///
/// The engine only ever needs these four views of a request; the transport
/// keeps ownership of message framing, options and retransmission state.
pub trait Req {
  /// The request method
  fn method(&self) -> Method;

  /// The URI path relative to the resource root, e.g. `"3312/0/5850"`.
  ///
  /// A leading `/` is accepted and ignored.
  fn url(&self) -> &str;

  /// The Content-Format option, if the request carried one
  fn content_format(&self) -> Option<ContentFormat>;

  /// The payload bytes (empty slice when there is no payload)
  fn payload(&self) -> &[u8];
}
