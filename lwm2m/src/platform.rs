use core::fmt::Debug;

use embedded_time::duration::Seconds;
use no_std_net::{Ipv6Addr, SocketAddr};

/// The seam to the CoAP transport.
///
/// The engine never frames messages itself; it asks the transport to hook
/// object paths into its resource tree and to perform the confirmable
/// requests of the bootstrap/registration flow.
pub trait Transport {
  /// The error yielded by transport operations
  type Error: Debug;

  /// Hook a registered object's URI path (e.g. `"3312"`) into the resource
  /// tree, so requests whose path begins with it reach
  /// [`Engine::handle`](crate::engine::Engine::handle).
  fn activate(&mut self, path: &str);

  /// Issue a confirmable POST and block until it is ACKed or times out.
  ///
  /// `query` is the full query string as the engine formats it, leading `?`
  /// included (`"?ep=node-0011AA"`).
  fn con_post(&mut self,
              server: SocketAddr,
              path: &str,
              query: &str,
              payload: &[u8])
              -> nb::Result<(), Self::Error>;
}

/// State of an interface address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrState {
  /// Duplicate address detection still in progress
  Tentative,
  /// Usable
  Preferred,
  /// Past its preferred lifetime
  Deprecated,
}

/// An IPv6 address owned by the local interface
#[derive(Debug, Clone, Copy)]
pub struct IfaceAddr {
  /// The address
  pub addr: Ipv6Addr,
  /// Its state
  pub state: AddrState,
}

/// The seam to the IPv6 stack.
///
/// In a RPL mesh [`default_route`](Network::default_route) is the DAG root,
/// which doubles as the server hint when no server was configured.
pub trait Network {
  /// Enumerate the local interface addresses
  fn addresses(&self) -> &[IfaceAddr];

  /// The default next hop, if the node currently has one
  fn default_route(&self) -> Option<Ipv6Addr>;

  /// Whether the node has network access at all
  fn has_route(&self) -> bool {
    self.default_route().is_some()
  }
}

/// Whole seconds elapsed on `clock` since it started.
///
/// Returns 0 when the clock misbehaves; on-time accounting degrades rather
/// than failing the request.
pub fn clock_seconds<C: embedded_time::Clock<T = u64>>(clock: &C) -> u64 {
  clock.try_now()
       .ok()
       .and_then(|now| Seconds::<u64>::try_from(now.duration_since_epoch()).ok())
       .map(|Seconds(s)| s)
       .unwrap_or(0)
}
