//! IPSO smart objects for the [`lwm2m`] client engine.
//!
//! IPSO objects are standardized LWM2M object ids for classes of device;
//! this crate carries the ones this project ships hardware for. Each module
//! wires its object's semantics into the engine through callback resources,
//! keeping the actual state (relay on/off, accounting) on this side of the
//! seam.

// docs
#![doc(html_root_url = "https://docs.rs/lwm2m-ipso/0.1.0")]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]

/// IPSO Power Control (object 3312): a smart plug
pub mod power_control;

pub use power_control::PowerControl;
