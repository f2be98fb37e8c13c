//! The object → instance → resource data model.
//!
//! An [`Object`] owns a fixed array of instance slots and one shared table
//! of resource definitions. Slots are allocated at construction and only
//! ever toggle their used flag; no storage moves after registration, so a
//! slot index is a stable identity for the lifetime of the process.

use core::fmt::Write as _;

use crate::context::Context;
use crate::writable::Writable;

/// A value-bearing resource's storage.
///
/// The declared type is immutable: setters refuse a value of the wrong
/// type instead of silently re-tagging the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  /// UTF-8 text
  String(String),
  /// Raw bytes
  Opaque(Vec<u8>),
  /// Signed integer
  Int(i32),
  /// Fixed-point rational with [`FLOATFIX_BITS`](crate::codec::FLOATFIX_BITS)
  /// fraction bits
  FloatFix(i32),
  /// Boolean
  Boolean(bool),
}

/// Reads the current value of a callback resource into the output buffer,
/// returning the bytes produced (0 = failure).
pub type ReadFn = Box<dyn FnMut(&Context, &mut [u8]) -> usize>;

/// Writes the request payload into a callback resource, returning the bytes
/// consumed (0 = the payload did not decode).
pub type WriteFn = Box<dyn FnMut(&Context, &[u8], &mut [u8]) -> usize>;

/// Executes a callback resource with the request payload as its argument.
pub type ExecFn = Box<dyn FnMut(&Context, &[u8], &mut [u8]) -> usize>;

/// The read/write/exec triple of a callback resource. Any of the three may
/// be absent; the dispatcher answers 4.05 for the missing ones.
#[allow(missing_debug_implementations)]
#[derive(Default)]
pub struct Callback {
  /// Serves GET
  pub read: Option<ReadFn>,
  /// Serves PUT
  pub write: Option<WriteFn>,
  /// Serves POST
  pub exec: Option<ExecFn>,
}

impl Callback {
  /// A readable, writable resource
  pub fn read_write(read: impl FnMut(&Context, &mut [u8]) -> usize + 'static,
                    write: impl FnMut(&Context, &[u8], &mut [u8]) -> usize + 'static)
                    -> Self {
    Self { read: Some(Box::new(read)),
           write: Some(Box::new(write)),
           exec: None }
  }

  /// A read-only resource
  pub fn read_only(read: impl FnMut(&Context, &mut [u8]) -> usize + 'static) -> Self {
    Self { read: Some(Box::new(read)),
           write: None,
           exec: None }
  }

  /// An executable-only resource
  pub fn exec_only(exec: impl FnMut(&Context, &[u8], &mut [u8]) -> usize + 'static) -> Self {
    Self { read: None,
           write: None,
           exec: Some(Box::new(exec)) }
  }
}

/// What a resource is: a stored value or a callback triple.
#[allow(missing_debug_implementations)]
pub enum Kind {
  /// Storage lives in the object's shared resource table
  Value(Value),
  /// Behavior lives in the owning module's callbacks
  Callback(Callback),
}

/// One resource definition, shared by every instance of the owning object.
#[allow(missing_debug_implementations)]
pub struct Resource {
  pub(crate) id: u16,
  pub(crate) kind: Kind,
}

impl Resource {
  /// A string resource
  pub fn string(id: u16, value: &str) -> Self {
    Self { id,
           kind: Kind::Value(Value::String(value.into())) }
  }

  /// An opaque (raw bytes) resource
  pub fn opaque(id: u16, value: &[u8]) -> Self {
    Self { id,
           kind: Kind::Value(Value::Opaque(value.into())) }
  }

  /// An integer resource
  pub fn int(id: u16, value: i32) -> Self {
    Self { id,
           kind: Kind::Value(Value::Int(value)) }
  }

  /// A fixed-point resource
  pub fn floatfix(id: u16, value: i32) -> Self {
    Self { id,
           kind: Kind::Value(Value::FloatFix(value)) }
  }

  /// A boolean resource
  pub fn boolean(id: u16, value: bool) -> Self {
    Self { id,
           kind: Kind::Value(Value::Boolean(value)) }
  }

  /// A callback resource
  pub fn callback(id: u16, callback: Callback) -> Self {
    Self { id,
           kind: Kind::Callback(callback) }
  }

  /// The resource id
  pub fn id(&self) -> u16 {
    self.id
  }

  /// The stored value, if this is a value resource
  pub fn value(&self) -> Option<&Value> {
    match &self.kind {
      | Kind::Value(value) => Some(value),
      | Kind::Callback(_) => None,
    }
  }

  /// Replace a string value; `false` if the resource is not a string.
  pub fn set_string(&mut self, value: &str) -> bool {
    match &mut self.kind {
      | Kind::Value(Value::String(s)) => {
        s.clear();
        s.push_str(value);
        true
      },
      | _ => false,
    }
  }

  /// Replace an opaque value; `false` if the resource is not opaque.
  pub fn set_opaque(&mut self, value: &[u8]) -> bool {
    match &mut self.kind {
      | Kind::Value(Value::Opaque(bytes)) => {
        bytes.clear();
        bytes.extend_from_slice(value);
        true
      },
      | _ => false,
    }
  }

  /// Replace an integer value; `false` if the resource is not an integer.
  pub fn set_int(&mut self, value: i32) -> bool {
    match &mut self.kind {
      | Kind::Value(Value::Int(v)) => {
        *v = value;
        true
      },
      | _ => false,
    }
  }

  /// Replace a fixed-point value; `false` if the resource is not one.
  pub fn set_floatfix(&mut self, value: i32) -> bool {
    match &mut self.kind {
      | Kind::Value(Value::FloatFix(v)) => {
        *v = value;
        true
      },
      | _ => false,
    }
  }

  /// Replace a boolean value; `false` if the resource is not a boolean.
  pub fn set_boolean(&mut self, value: bool) -> bool {
    match &mut self.kind {
      | Kind::Value(Value::Boolean(v)) => {
        *v = value;
        true
      },
      | _ => false,
    }
  }
}

/// One instance slot of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Instance {
  pub(crate) id: u16,
  pub(crate) used: bool,
}

impl Instance {
  /// The instance id (meaningful only while the slot is used)
  pub fn id(&self) -> u16 {
    self.id
  }

  /// Whether this slot currently holds an instance
  pub fn is_used(&self) -> bool {
    self.used
  }
}

/// An LWM2M object: an id, a URI path, instance slots and the resource
/// table shared by those instances.
#[allow(missing_debug_implementations)]
pub struct Object {
  pub(crate) id: u16,
  pub(crate) path: Writable<[u8; 8]>,
  pub(crate) instances: Vec<Instance>,
  pub(crate) resources: Vec<Resource>,
}

impl Object {
  /// Create an object with `slots` unused instance slots.
  pub fn new(id: u16, slots: usize) -> Self {
    let mut path = Writable::default();
    write!(path, "{}", id).ok();

    Self { id,
           path,
           instances: vec![Instance::default(); slots],
           resources: Vec::new() }
  }

  /// Mark the first unused slot as holding instance `id` (builder form,
  /// for instances that exist from boot).
  pub fn with_instance(mut self, id: u16) -> Self {
    let _ = self.create_instance(id);
    self
  }

  /// Append a resource definition (builder form).
  pub fn resource(mut self, resource: Resource) -> Self {
    self.resources.push(resource);
    self
  }

  /// The object id
  pub fn id(&self) -> u16 {
    self.id
  }

  /// The URI path this object answers under (`"3312"`)
  pub fn path(&self) -> &str {
    self.path.as_str()
  }

  /// The instance slots
  pub fn instances(&self) -> &[Instance] {
    &self.instances
  }

  /// Borrow a resource definition by id
  pub fn resource_ref(&self, id: u16) -> Option<&Resource> {
    self.resource_index(id).map(|ix| &self.resources[ix])
  }

  /// Mutably borrow a resource definition by id
  pub fn resource_mut(&mut self, id: u16) -> Option<&mut Resource> {
    self.resource_index(id).map(move |ix| &mut self.resources[ix])
  }

  /// The stored value of a value resource
  pub fn resource_value(&self, id: u16) -> Option<&Value> {
    self.resource_ref(id).and_then(Resource::value)
  }

  /// Slot index of the used instance with this id
  pub(crate) fn instance_index(&self, id: u16) -> Option<usize> {
    self.instances.iter().position(|i| i.used && i.id == id)
  }

  /// Slot index of the first used instance
  pub(crate) fn first_used(&self) -> Option<usize> {
    self.instances.iter().position(|i| i.used)
  }

  /// Index of the resource with this id in the shared table
  pub(crate) fn resource_index(&self, id: u16) -> Option<usize> {
    self.resources.iter().position(|r| r.id == id)
  }

  /// Claim the lowest-indexed free slot for instance `id`.
  pub(crate) fn create_instance(&mut self, id: u16) -> Option<usize> {
    let ix = self.instances.iter().position(|i| !i.used)?;
    self.instances[ix] = Instance { id, used: true };
    Some(ix)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn creation_takes_the_lowest_free_slot() {
    let mut object = Object::new(9, 3).with_instance(4);
    assert_eq!(object.create_instance(7), Some(1));
    assert_eq!(object.create_instance(2), Some(2));
    assert_eq!(object.create_instance(5), None);
    assert_eq!(object.instance_index(7), Some(1));
  }

  #[test]
  fn used_ids_stay_unique() {
    let object = Object::new(9, 4).with_instance(0).with_instance(1).with_instance(2);
    let used: Vec<u16> =
      object.instances().iter().filter(|i| i.is_used()).map(Instance::id).collect();
    let mut deduped = used.clone();
    deduped.dedup();
    assert_eq!(used, deduped);
  }

  #[test]
  fn unused_slots_do_not_resolve() {
    let object = Object::new(9, 2);
    assert_eq!(object.instance_index(0), None);
    assert_eq!(object.first_used(), None);
  }

  #[test]
  fn setters_refuse_type_mismatch() {
    let mut object = Object::new(9, 1).resource(Resource::int(0, 7));
    let resource = object.resource_mut(0).unwrap();
    assert!(!resource.set_string("nope"));
    assert!(!resource.set_boolean(true));
    assert!(resource.set_int(8));
    assert_eq!(object.resource_value(0), Some(&Value::Int(8)));
  }

  #[test]
  fn path_is_the_decimal_id() {
    assert_eq!(Object::new(3312, 1).path(), "3312");
    assert_eq!(Object::new(0, 1).path(), "0");
  }
}
