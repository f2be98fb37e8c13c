use super::{SERVER_LIFETIME, SERVER_OBJECT_ID, SERVER_SHORT_ID};
use crate::object::{Object, Resource};

/// Default registration lifetime, in seconds (one day).
pub const DEFAULT_LIFETIME: i32 = 86_400;

/// The Server object, with `slots` empty instance slots.
///
/// Instances are not pre-created: a bootstrap server POSTs them into
/// existence with a TLV payload.
pub fn object(slots: usize) -> Object {
  Object::new(SERVER_OBJECT_ID, slots).resource(Resource::int(SERVER_SHORT_ID, 0))
                                      .resource(Resource::int(SERVER_LIFETIME, DEFAULT_LIFETIME))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_slots_start_free() {
    let object = object(2);
    assert_eq!(object.id(), 1);
    assert!(object.instances().iter().all(|i| !i.is_used()));
  }
}
