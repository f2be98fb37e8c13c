//! The registration/bootstrap client.
//!
//! A state machine ticked by a host timer every [`TICK_SECONDS`]. Each tick
//! gates on network access and performs at most one action: send the
//! bootstrap request, read the Security object for the server URI, or send
//! the registration request listing every present instance.

use core::fmt::Write as _;

use no_std_net::{Ipv6Addr, SocketAddr, SocketAddrV6};

use crate::config::Config;
use crate::engine::Engine;
use crate::object::Value;
use crate::objects::{SECURITY_OBJECT_ID, SECURITY_SERVER_URI};
use crate::plain_text;
use crate::platform::{Network, Transport};
use crate::writable::Writable;

/// The CoAP default port, used whenever a server address arrives without one.
pub const COAP_DEFAULT_PORT: u16 = 5683;

/// The conventional bootstrap-server port.
pub const BOOTSTRAP_PORT: u16 = 5685;

/// How often the host should call [`Engine::tick`].
pub const TICK_SECONDS: u64 = 15;

/// Lifecycle of the registration/bootstrap client.
///
/// Transitions only ever walk forward
/// (`Idle → BsSent → BsInfoKnown → Registered`, skipping the bootstrap
/// states when bootstrap is off) or regress to `Idle` when a bootstrap
/// attempt fails; `Registered` is sticky until a setter resets it.
///
/// Registration is optimistic on send, so there is no separate "sent,
/// awaiting confirmation" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdState {
  /// Nothing accomplished yet
  Idle,
  /// The bootstrap request was handed to the transport
  BsSent,
  /// The Security object yielded a usable server address
  BsInfoKnown,
  /// The registration request was handed to the transport
  Registered,
}

/// Mutable client state, embedded in the engine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rd {
  pub(crate) use_bootstrap: bool,
  pub(crate) use_registration: bool,
  pub(crate) bs_server: Option<SocketAddr>,
  pub(crate) server: Option<SocketAddr>,
  pub(crate) state: RdState,
}

impl Rd {
  pub(crate) fn new(config: &Config) -> Self {
    Self { use_bootstrap: config.use_bootstrap,
           use_registration: config.use_registration,
           bs_server: config.bootstrap_server,
           server: config.registration_server,
           state: RdState::Idle }
  }
}

/// Why a Security server URI was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriError {
  /// `coaps:` - DTLS is not supported
  Secure,
  /// Not a `coap://[<ipv6>]:<port>` shape this client understands
  Malformed,
}

impl Engine {
  /// Where the client currently is in its bootstrap/registration life.
  pub fn state(&self) -> RdState {
    self.rd.state
  }

  /// Enable or disable the bootstrap phase.
  pub fn use_bootstrap_server(&mut self, use_bootstrap: bool) {
    self.rd.use_bootstrap = use_bootstrap;
  }

  /// Enable or disable registration.
  pub fn use_registration_server(&mut self, use_registration: bool) {
    self.rd.use_registration = use_registration;
  }

  /// Set the registration server and force a fresh registration on the
  /// next tick.
  pub fn register_with_server(&mut self, server: SocketAddr) {
    self.rd.server = Some(server);
    if self.rd.state == RdState::Registered {
      self.rd.state = if self.rd.use_bootstrap { RdState::BsInfoKnown } else { RdState::Idle };
    }
  }

  /// Set the bootstrap server and restart the whole flow on the next tick.
  pub fn register_with_bootstrap_server(&mut self, server: SocketAddr) {
    self.rd.bs_server = Some(server);
    self.rd.state = RdState::Idle;
  }

  /// One timer tick: gate on network access, then perform at most one of
  /// the bootstrap/registration actions.
  pub fn tick<T: Transport, N: Network>(&mut self, transport: &mut T, net: &N) {
    if !net.has_route() {
      // wait for a network to join
      log::trace!("rd: no network access");
      return;
    }

    let state = self.rd.state;
    if self.rd.use_bootstrap && state == RdState::Idle {
      self.send_bootstrap(transport, net);
    } else if self.rd.use_bootstrap && state == RdState::BsSent {
      self.read_security_object();
    } else if self.rd.use_registration && state != RdState::Registered {
      self.send_registration(transport, net);
    }
  }

  fn send_bootstrap<T: Transport, N: Network>(&mut self, transport: &mut T, net: &N) {
    let server = match self.rd.bs_server.or_else(|| default_server(net)) {
      | Some(server) => server,
      | None => return,
    };

    log::info!("registering with bootstrap server {} as '{}'",
               server,
               self.endpoint.as_str());

    if let Err(e) = nb::block!(transport.con_post(server, "/bs", self.endpoint.as_str(), &[])) {
      log::warn!("bootstrap request failed: {:?}", e);
    }
    self.rd.state = RdState::BsSent;
  }

  /// Fetch the Security object's server URI and try to turn it into a
  /// registration server address. Anything short of success regresses to
  /// `Idle` so the next tick retries the bootstrap server.
  fn read_security_object(&mut self) {
    log::debug!("bootstrap - checking for server info");

    let uri = self.registry
                  .get(SECURITY_OBJECT_ID)
                  .filter(|o| o.first_used().is_some())
                  .and_then(|o| o.resource_value(SECURITY_SERVER_URI))
                  .and_then(|value| match value {
                    | Value::String(s) if !s.is_empty() => Some(s.as_str()),
                    | _ => None,
                  });

    match uri.map(parse_server_uri) {
      | Some(Ok(server)) => {
        log::info!("bootstrap found server {}", server);
        self.rd.server = Some(server);
        self.rd.state = RdState::BsInfoKnown;
      },
      | Some(Err(UriError::Secure)) => {
        log::warn!("secure CoAP requested but not supported - cannot bootstrap");
        self.rd.state = RdState::Idle;
      },
      | Some(Err(UriError::Malformed)) => {
        log::warn!("failed to parse server URI");
        self.rd.state = RdState::Idle;
      },
      | None => {
        // not ready; retry with the bootstrap server again
        self.rd.state = RdState::Idle;
      },
    }
  }

  fn send_registration<T: Transport, N: Network>(&mut self, transport: &mut T, net: &N) {
    let server = match self.rd.server.or_else(|| default_server(net)) {
      | Some(server) => server,
      | None => return,
    };

    let mut payload = Writable::<[u8; 128]>::default();
    for object in self.registry.iter() {
      for instance in object.instances().iter().filter(|i| i.is_used()) {
        let mark = payload.len();
        let sep = if mark > 0 { "," } else { "" };
        if write!(payload, "{}<{}/{}>", sep, object.id(), instance.id()).is_err() {
          payload.rewind(mark);
          log::warn!("rd payload full; dropping <{}/{}>", object.id(), instance.id());
        }
      }
    }

    log::info!("registering endpoint '{}': '{}'", self.endpoint.as_str(), payload.as_str());

    match nb::block!(transport.con_post(server, "/rd", self.endpoint.as_str(), &payload[..])) {
      | Ok(()) => self.rd.state = RdState::Registered,
      | Err(e) => log::warn!("registration request failed: {:?}", e),
    }
  }
}

/// Fall back to the DAG root when no server was configured.
fn default_server<N: Network>(net: &N) -> Option<SocketAddr> {
  net.default_route()
     .map(|ip| SocketAddr::V6(SocketAddrV6::new(ip, COAP_DEFAULT_PORT, 0, 0)))
}

/// Parse a Security server URI: `coap://[<ipv6>]:<port>`, port optional.
///
/// Only bracketed IPv6 literals are accepted; a `coaps:` scheme parses but
/// is refused.
pub(crate) fn parse_server_uri(uri: &str) -> Result<SocketAddr, UriError> {
  let start = uri.find('[').ok_or(UriError::Malformed)?;
  if start == 0 {
    // no scheme at all
    return Err(UriError::Malformed);
  }
  let end = uri[start..].find(']').map(|n| start + n).ok_or(UriError::Malformed)?;
  let addr: Ipv6Addr = uri[start + 1..end].parse().map_err(|_| UriError::Malformed)?;

  let port = match uri.as_bytes()[end + 1..].split_first() {
    | Some((b':', digits)) => match plain_text::read_int(digits) {
      | Some((port, _)) if port > 0 && port <= i32::from(u16::MAX) => port as u16,
      | _ => COAP_DEFAULT_PORT,
    },
    | _ => COAP_DEFAULT_PORT,
  };

  if uri.starts_with("coaps:") {
    return Err(UriError::Secure);
  }

  Ok(SocketAddr::V6(SocketAddrV6::new(addr, port, 0, 0)))
}
