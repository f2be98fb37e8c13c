//! The core LWM2M objects every client carries.
//!
//! Security holds what the bootstrap flow writes and reads back; Server
//! holds the registration account a bootstrap server creates; Device
//! describes the hardware. All three are plain value objects — no
//! callbacks — so a bootstrap server can fill them over TLV writes.

/// LWM2M Security (object 0)
pub mod security;

/// LWM2M Server (object 1)
pub mod server;

/// LWM2M Device (object 3)
pub mod device;

/// Object id of LWM2M Security
pub const SECURITY_OBJECT_ID: u16 = 0;
/// Security: LWM2M Server URI (`coap://[…]:port`)
pub const SECURITY_SERVER_URI: u16 = 0;
/// Security: Bootstrap-Server flag
pub const SECURITY_BOOTSTRAP: u16 = 1;
/// Security: Security Mode (3 = NoSec)
pub const SECURITY_MODE: u16 = 2;

/// Object id of LWM2M Server
pub const SERVER_OBJECT_ID: u16 = 1;
/// Server: Short Server ID
pub const SERVER_SHORT_ID: u16 = 0;
/// Server: Lifetime in seconds
pub const SERVER_LIFETIME: u16 = 1;

/// Object id of LWM2M Device
pub const DEVICE_OBJECT_ID: u16 = 3;
/// Device: Manufacturer
pub const DEVICE_MANUFACTURER: u16 = 0;
/// Device: Model Number
pub const DEVICE_MODEL: u16 = 1;
/// Device: Serial Number
pub const DEVICE_SERIAL: u16 = 2;
/// Device: Firmware Version
pub const DEVICE_FIRMWARE: u16 = 3;
