use super::{DEVICE_FIRMWARE, DEVICE_MANUFACTURER, DEVICE_MODEL, DEVICE_OBJECT_ID, DEVICE_SERIAL};
use crate::object::{Object, Resource};

/// The Device object, instance 0 describing this node.
pub fn object() -> Object {
  with_strings("lwm2m-rs", "node", "0001", env!("CARGO_PKG_VERSION"))
}

/// A Device object with the caller's identification strings.
pub fn with_strings(manufacturer: &str, model: &str, serial: &str, firmware: &str) -> Object {
  Object::new(DEVICE_OBJECT_ID, 1).with_instance(0)
                                  .resource(Resource::string(DEVICE_MANUFACTURER, manufacturer))
                                  .resource(Resource::string(DEVICE_MODEL, model))
                                  .resource(Resource::string(DEVICE_SERIAL, serial))
                                  .resource(Resource::string(DEVICE_FIRMWARE, firmware))
}
