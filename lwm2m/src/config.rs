use no_std_net::SocketAddr;

/// Engine configuration.
///
/// These are the knobs the C engine this is modelled on took at compile
/// time; a Rust engine takes them as a value so tests can build isolated
/// engines per case.
///
/// ```
/// use lwm2m::Config;
///
/// let config = Config { endpoint_name: Some("smart-plug-7"),
///                       use_registration: true,
///                       ..Config::default() };
/// assert_eq!(config.endpoint_prefix, "lwm2m-");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Config {
  /// Endpoint name prefix used when no explicit name is configured
  pub endpoint_prefix: &'static str,
  /// Explicit endpoint name; overrides derivation from the IPv6 address
  pub endpoint_name: Option<&'static str>,
  /// Bootstrap server, when known ahead of time
  pub bootstrap_server: Option<SocketAddr>,
  /// Registration server, when known ahead of time
  pub registration_server: Option<SocketAddr>,
  /// Contact a bootstrap server to discover the registration server
  pub use_bootstrap: bool,
  /// Register the object model with the registration server
  pub use_registration: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self { endpoint_prefix: "lwm2m-",
           endpoint_name: None,
           bootstrap_server: None,
           registration_server: None,
           use_bootstrap: false,
           use_registration: false }
  }
}
