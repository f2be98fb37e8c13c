//! Endpoint naming: the `?ep=` query identifying this client to servers.

use core::fmt::Write as _;

use crate::config::Config;
use crate::platform::{AddrState, Network};
use crate::writable::Writable;

/// The whole query, `?ep=` included, fits this many bytes.
const ENDPOINT_SIZE: usize = 32;

/// Room the derived name must leave for the 12 hex digits (plus slack for
/// the query prefix), limiting how much of the configured prefix survives.
const HEX_RESERVE: usize = 13;

pub(crate) type Endpoint = Writable<[u8; ENDPOINT_SIZE]>;

/// Build the endpoint query.
///
/// With a configured name the query is literally `?ep=<name>`. Otherwise
/// the name is the configured prefix followed by the last 6 bytes of a
/// preferred-or-tentative interface address in uppercase hex; whatever does
/// not fit the 32-byte budget is dropped from the end.
pub(crate) fn build<N: Network>(config: &Config, net: &N) -> Endpoint {
  let mut endpoint = Endpoint::default();
  endpoint.push_trunc("?ep=");

  if let Some(name) = config.endpoint_name {
    endpoint.push_trunc(name);
    return endpoint;
  }

  let prefix = config.endpoint_prefix;
  let keep = prefix.len().min(ENDPOINT_SIZE - HEX_RESERVE);
  endpoint.push_trunc(&prefix[..keep]);

  let addr = net.addresses()
                .iter()
                .find(|a| matches!(a.state, AddrState::Tentative | AddrState::Preferred));
  if let Some(addr) = addr {
    for byte in &addr.addr.octets()[10..] {
      write!(endpoint, "{:02X}", byte).ok();
    }
  }

  endpoint
}
