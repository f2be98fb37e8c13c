//! `lwm2m` is a transport-agnostic OMA Lightweight M2M client engine
//! for constrained devices.
//!
//! ## LWM2M
//! LWM2M is a device-management protocol layered on CoAP. A client exposes a
//! tree of **objects** (a device class, e.g. `3312` = IPSO Power Control),
//! each holding **instances**, each holding **resources** (a single value or
//! an action). Servers address the tree with URIs of the shape `/O`, `/O/I`
//! or `/O/I/R` and read, write and execute resources with the ordinary CoAP
//! methods.
//!
//! This crate provides:
//! - the object/instance/resource model and a bounded [`registry::Registry`],
//! - plain-text and OMA-TLV value codecs ([`plain_text`], [`tlv`], [`codec`]),
//! - URI parsing into a request [`context::Context`],
//! - the request dispatcher ([`engine::Engine::handle`]),
//! - the bootstrap/registration client ([`engine::Engine::tick`]),
//! - the core Security/Server/Device objects ([`objects`]).
//!
//! What it deliberately does **not** provide is a CoAP stack: message
//! framing, retransmission and blockwise transfer belong to the transport
//! behind the [`platform::Transport`] seam, and the IPv6 neighborhood behind
//! [`platform::Network`].
//!
//! ```
//! use lwm2m::object::{Object, Resource};
//!
//! // LWM2M Server object with two instance slots, created by a
//! // bootstrap server at runtime
//! let server = Object::new(1, 2).resource(Resource::int(0, 101))
//!                               .resource(Resource::int(1, 86_400));
//! assert!(server.instances().iter().all(|i| !i.is_used()));
//! ```

// docs
#![doc(html_root_url = "https://docs.rs/lwm2m/0.1.0")]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]

/// Reader/writer selection over the value codecs
pub mod codec;

/// Engine configuration
pub mod config;

/// CoAP Content-Format values
pub mod content_format;

/// Request context parsed from a URI path
pub mod context;

/// The request dispatcher and engine entry points
pub mod engine;

/// The object/instance/resource data model
pub mod object;

/// Core LWM2M objects (Security, Server, Device)
pub mod objects;

/// Plain-text value codec
pub mod plain_text;

/// Seams to the transport, network stack and clock
pub mod platform;

/// The registration/bootstrap client
pub mod rd;

/// The bounded object registry
pub mod registry;

/// Incoming CoAP requests, as the engine sees them
pub mod req;

/// Outgoing CoAP responses, as the engine fills them
pub mod resp;

/// OMA-TLV value codec
pub mod tlv;

mod endpoint;
mod writable;


pub use config::Config;
pub use context::Context;
pub use engine::Engine;
pub use rd::RdState;
