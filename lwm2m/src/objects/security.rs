use super::{SECURITY_BOOTSTRAP, SECURITY_MODE, SECURITY_OBJECT_ID, SECURITY_SERVER_URI};
use crate::object::{Object, Resource};

/// Security mode 3: NoSec. The only mode this client speaks; a `coaps:`
/// server URI is rejected at bootstrap.
pub const MODE_NOSEC: i32 = 3;

/// The Security object, with instance 0 present and an empty server URI
/// for the bootstrap exchange to fill in.
pub fn object() -> Object {
  Object::new(SECURITY_OBJECT_ID, 1).with_instance(0)
                                    .resource(Resource::string(SECURITY_SERVER_URI, ""))
                                    .resource(Resource::boolean(SECURITY_BOOTSTRAP, false))
                                    .resource(Resource::int(SECURITY_MODE, MODE_NOSEC))
}
