//! The engine: object registration and the CoAP request dispatcher.

use core::fmt::Write as _;

use crate::codec::{Reader, FLOATFIX_BITS};
use crate::config::Config;
use crate::content_format::ContentFormat;
use crate::context::Context;
use crate::endpoint::{self, Endpoint};
use crate::object::{Kind, Object, Resource, Value};
use crate::objects::{device, security, server};
use crate::platform::{Network, Transport};
use crate::rd::Rd;
use crate::registry::{RegisterError, Registry};
use crate::req::{Method, Req};
use crate::resp::{code, Resp};
use crate::tlv;
use crate::writable::SliceWriter;

/// The LWM2M engine: the object registry, the request dispatcher and the
/// registration/bootstrap client, owned as one value so tests can build
/// isolated engines per case.
///
/// The transport resolves which requests belong to the engine (it hooked
/// the object paths via [`Transport::activate`] at registration time) and
/// calls [`handle`](Engine::handle) with each; a 15-second host timer
/// drives [`tick`](Engine::tick).
#[allow(missing_debug_implementations)]
pub struct Engine {
  pub(crate) registry: Registry,
  pub(crate) endpoint: Endpoint,
  pub(crate) rd: Rd,
}

impl Engine {
  /// Create an engine.
  ///
  /// The network stack is consulted once, for the endpoint name
  /// ([`Config::endpoint_prefix`] plus interface-address hex unless
  /// [`Config::endpoint_name`] overrides it).
  pub fn new<N: Network>(config: Config, net: &N) -> Self {
    let endpoint = endpoint::build(&config, net);
    log::info!("rd client starting with endpoint '{}'", endpoint.as_str());

    Self { registry: Registry::default(),
           endpoint,
           rd: Rd::new(&config) }
  }

  /// Register an object and hook its path into the transport's resource
  /// tree.
  pub fn register<T: Transport>(&mut self,
                                object: Object,
                                transport: &mut T)
                                -> Result<(), RegisterError> {
    let path = object.path;
    self.registry.add(object)?;
    transport.activate(path.as_str());
    Ok(())
  }

  /// Register the Security, Server and Device objects.
  pub fn register_default_objects<T: Transport>(&mut self,
                                                transport: &mut T)
                                                -> Result<(), RegisterError> {
    self.register(security::object(), transport)?;
    self.register(server::object(2), transport)?;
    self.register(device::object(), transport)
  }

  /// The registered objects.
  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// The registered objects, mutably (provisioning, tests).
  pub fn registry_mut(&mut self) -> &mut Registry {
    &mut self.registry
  }

  /// The endpoint query (`"?ep=…"`) sent with `/bs` and `/rd`.
  pub fn endpoint(&self) -> &str {
    self.endpoint.as_str()
  }

  /// Dispatch one CoAP request against the object model.
  ///
  /// `buffer` is the transport's response body buffer; serialized values
  /// land there and `resp` borrows from it. `_offset` is the blockwise
  /// offset, unused at this revision.
  pub fn handle<R: Req, S: Resp>(&mut self,
                                 req: &R,
                                 resp: &mut S,
                                 buffer: &mut [u8],
                                 _offset: i32) {
    let method = req.method();
    // no format on the wire means plain text, and CoAP text/plain is
    // LWM2M plain text as far as the engine cares
    let format = req.content_format().unwrap_or(ContentFormat::Text);

    let mut ctx = match Context::parse(req.url()) {
      | Ok(ctx) => ctx,
      | Err(_) => {
        log::debug!("unparseable path '{}'", req.url());
        resp.set_code(code::NOT_FOUND);
        return;
      },
    };

    log::debug!("{:?} /{} format {:?} depth {}", method, req.url(), format, ctx.depth);

    if method == Method::Delete {
      // no resource teardown beyond what the transport does itself
      resp.set_code(code::DELETED);
      return;
    }

    if ctx.depth == 0 {
      resp.set_code(code::NOT_FOUND);
      return;
    }

    let object = match self.registry.get_mut(ctx.object_id) {
      | Some(object) => object,
      | None => {
        log::debug!("object {} not registered", ctx.object_id);
        resp.set_code(code::NOT_FOUND);
        return;
      },
    };

    // a path without an instance segment never resolves, like a missing
    // instance id does; PUT/POST then fall into creation with the
    // (default) instance id from the context
    let resolved = if ctx.depth >= 2 { object.instance_index(ctx.object_instance_id) } else { None };
    match resolved {
      | Some(ix) => ctx.object_instance_index = Some(ix),
      | None => {
        match method {
          | Method::Put | Method::Post => create(object, &mut ctx, req, resp),
          | _ => {
            log::debug!("no instance {}/{}", ctx.object_id, ctx.object_instance_id);
            resp.set_code(code::NOT_FOUND);
          },
        }
        return;
      },
    }

    match ctx.depth {
      | 3 => dispatch_resource(object, &mut ctx, format, req, resp, buffer),
      | 2 if method == Method::Get => snapshot(object, &ctx, format, resp, buffer),
      // the one genuine silent fall-through of the engine this is
      // modelled on: a non-GET on an instance has nothing to say
      | _ => resp.set_code(code::METHOD_NOT_ALLOWED),
    }
  }
}

/// Instance creation: claim the lowest free slot and write any TLV records
/// in the payload into the fresh instance.
fn create<R: Req, S: Resp>(object: &mut Object, ctx: &mut Context, req: &R, resp: &mut S) {
  // a depth-1 create skips instance resolution, so the (default) id may
  // already be taken; reuse that slot rather than minting a duplicate id
  let existing = object.instance_index(ctx.object_instance_id);
  match existing.or_else(|| object.create_instance(ctx.object_instance_id)) {
    | Some(ix) => ctx.object_instance_index = Some(ix),
    | None => {
      log::warn!("cannot create {}/{}: no free slot",
                 ctx.object_id,
                 ctx.object_instance_id);
      resp.set_code(code::NOT_ACCEPTABLE);
      return;
    },
  }

  if existing.is_none() {
    log::info!("created instance {}/{}", ctx.object_id, ctx.object_instance_id);
  }
  resp.set_code(code::CREATED);

  let payload = req.payload();
  let mut pos = 0;
  while pos < payload.len() {
    match tlv::read(&payload[pos..]) {
      | Some((record, used)) => {
        if record.ty == tlv::Type::Resource {
          write_record(object, &record);
        }
        pos += used;
      },
      | None => {
        log::warn!("malformed TLV in create payload at offset {}", pos);
        resp.set_code(code::NOT_ACCEPTABLE);
        return;
      },
    }
  }
}

/// Coerce one TLV record into the matching resource. Unknown ids and
/// callback resources are skipped.
fn write_record(object: &mut Object, record: &tlv::Tlv<'_>) {
  let resource = match object.resource_mut(record.id) {
    | Some(resource) => resource,
    | None => {
      log::trace!("create: skipping unknown resource {}", record.id);
      return;
    },
  };

  let stored = match resource.value() {
    | Some(Value::String(_)) => match core::str::from_utf8(record.value) {
      | Ok(s) => resource.set_string(s),
      | Err(_) => false,
    },
    | Some(Value::Opaque(_)) => resource.set_opaque(record.value),
    | Some(Value::Int(_)) => resource.set_int(tlv::get_int32(record)),
    // the fixed-point coercion keeps the record's integer view, as the
    // engine this is modelled on did
    | Some(Value::FloatFix(_)) => resource.set_floatfix(tlv::get_int32(record)),
    | Some(Value::Boolean(_)) => resource.set_boolean(tlv::get_int32(record) != 0),
    | None => false,
  };

  if !stored {
    log::trace!("create: skipping resource {}", record.id);
  }
}

fn dispatch_resource<R: Req, S: Resp>(object: &mut Object,
                                      ctx: &mut Context,
                                      format: ContentFormat,
                                      req: &R,
                                      resp: &mut S,
                                      buffer: &mut [u8]) {
  let resource = match object.resource_index(ctx.resource_id) {
    | Some(ix) => {
      ctx.resource_index = Some(ix);
      &mut object.resources[ix]
    },
    | None => {
      log::debug!("no resource {} in object {}", ctx.resource_id, ctx.object_id);
      resp.set_code(code::NOT_FOUND);
      return;
    },
  };

  match req.method() {
    | Method::Get => get(resource, ctx, resp, buffer),
    | Method::Put => put(resource, ctx, format, req, resp, buffer),
    | Method::Post => post(resource, ctx, req, resp, buffer),
    // answered before dispatch
    | Method::Delete => (),
  }
}

fn get<S: Resp>(resource: &mut Resource, ctx: &Context, resp: &mut S, buffer: &mut [u8]) {
  let written = match &mut resource.kind {
    | Kind::Value(Value::String(s)) => {
      resp.set_payload(s.as_bytes());
      resp.set_content_format(ContentFormat::Text);
      resp.set_code(code::CONTENT);
      return;
    },
    | Kind::Value(Value::Opaque(bytes)) => {
      resp.set_payload(bytes);
      resp.set_content_format(ContentFormat::OctetStream);
      resp.set_code(code::CONTENT);
      return;
    },
    | Kind::Value(Value::Int(v)) => tlv::write_int32(ctx.resource_id, *v, buffer),
    | Kind::Value(Value::FloatFix(v)) => {
      tlv::write_float32(ctx.resource_id, *v, FLOATFIX_BITS, buffer)
    },
    | Kind::Value(Value::Boolean(v)) => tlv::write_int32(ctx.resource_id, i32::from(*v), buffer),
    | Kind::Callback(callback) => match callback.read.as_mut() {
      | Some(read) => read(ctx, buffer),
      | None => {
        resp.set_code(code::METHOD_NOT_ALLOWED);
        return;
      },
    },
  };

  if written > 0 {
    resp.set_payload(&buffer[..written]);
    resp.set_content_format(ContentFormat::Tlv);
    resp.set_code(code::CONTENT);
  } else {
    // failed to produce output - an internal error
    resp.set_code(code::INTERNAL_SERVER_ERROR);
  }
}

fn put<R: Req, S: Resp>(resource: &mut Resource,
                        ctx: &mut Context,
                        format: ContentFormat,
                        req: &R,
                        resp: &mut S,
                        buffer: &mut [u8]) {
  let callback = match &mut resource.kind {
    | Kind::Callback(callback) => callback,
    | Kind::Value(_) => {
      log::debug!("PUT on non-callback resource {}", ctx.resource_id);
      resp.set_code(code::METHOD_NOT_ALLOWED);
      return;
    },
  };

  let write = match callback.write.as_mut() {
    | Some(write) => write,
    | None => {
      resp.set_code(code::METHOD_NOT_ALLOWED);
      return;
    },
  };

  if format != ContentFormat::Text {
    log::debug!("PUT with format {:?} refused", format);
    resp.set_code(code::NOT_ACCEPTABLE);
    return;
  }

  ctx.reader = Reader::PlainText;
  if write(ctx, req.payload(), buffer) > 0 {
    resp.set_code(code::CHANGED);
  } else {
    // the payload did not decode; the resource is unchanged
    resp.set_code(code::NOT_ACCEPTABLE);
  }
}

fn post<R: Req, S: Resp>(resource: &mut Resource,
                         ctx: &Context,
                         req: &R,
                         resp: &mut S,
                         buffer: &mut [u8]) {
  let exec = match &mut resource.kind {
    | Kind::Callback(callback) => callback.exec.as_mut(),
    | Kind::Value(_) => None,
  };

  match exec {
    | Some(exec) => {
      exec(ctx, req.payload(), buffer);
      resp.set_code(code::CHANGED);
    },
    | None => {
      log::debug!("POST on non-executable resource {}", ctx.resource_id);
      resp.set_code(code::METHOD_NOT_ALLOWED);
    },
  }
}

/// Depth-2 GET: an instance snapshot, as SenML-ish JSON or (on request) an
/// application/link-format target list.
fn snapshot<S: Resp>(object: &Object,
                     ctx: &Context,
                     format: ContentFormat,
                     resp: &mut S,
                     buffer: &mut [u8]) {
  let link = format == ContentFormat::LinkFormat;
  let written = if link {
    links(object, ctx, buffer)
  } else {
    senml_json(object, ctx, buffer)
  };

  if written > 0 {
    resp.set_payload(&buffer[..written]);
    resp.set_content_format(if link { ContentFormat::LinkFormat } else { ContentFormat::Json });
    resp.set_code(code::CONTENT);
  } else {
    resp.set_code(code::INTERNAL_SERVER_ERROR);
  }
}

fn links(object: &Object, ctx: &Context, buffer: &mut [u8]) -> usize {
  let mut w = SliceWriter::new(buffer);
  write!(w, "<{}/{}>", object.id(), ctx.object_instance_id).ok();
  for resource in &object.resources {
    write!(w, ",<{}/{}/{}>", object.id(), ctx.object_instance_id, resource.id()).ok();
  }
  w.finish()
}

fn senml_json(object: &Object, _ctx: &Context, buffer: &mut [u8]) -> usize {
  let mut w = SliceWriter::new(buffer);
  let mut sep = "";
  write!(w, "{{\"e\":[").ok();
  for resource in &object.resources {
    match resource.value() {
      | Some(Value::String(s)) => {
        write!(w, "{}{{\"n\":\"{}\",\"vs\":\"{}\"}}", sep, resource.id(), s).ok();
      },
      // fixed-point values keep their raw integer rendering
      | Some(Value::Int(v)) | Some(Value::FloatFix(v)) => {
        write!(w, "{}{{\"n\":\"{}\",\"v\":{}}}", sep, resource.id(), v).ok();
      },
      | Some(Value::Boolean(v)) => {
        write!(w, "{}{{\"n\":\"{}\",\"v\":{}}}", sep, resource.id(), v).ok();
      },
      | Some(Value::Opaque(_)) | None => continue,
    }
    sep = ",";
  }
  write!(w, "]}}").ok();
  w.finish()
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;
  use crate::object::Callback;
  use crate::test::{NetworkMock, ReqMock, RespMock, TransportMock};

  fn engine() -> Engine {
    Engine::new(Config::default(), &NetworkMock::default())
  }

  fn engine_with(object: Object) -> Engine {
    let mut engine = engine();
    engine.register(object, &mut TransportMock::default()).unwrap();
    engine
  }

  /// Object 42 with instance 0 and one resource of each value type.
  fn value_object() -> Object {
    Object::new(42, 2).with_instance(0)
                      .resource(Resource::string(1, "hello"))
                      .resource(Resource::int(2, 1234))
                      .resource(Resource::boolean(3, true))
                      .resource(Resource::floatfix(4, 512))
  }

  fn get(engine: &mut Engine, url: &str) -> RespMock {
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::get(url), &mut resp, &mut buffer, 0);
    resp
  }

  #[test]
  fn get_string_is_plain_text() {
    let resp = get(&mut engine_with(value_object()), "42/0/1");
    assert_eq!(resp.code, Some(code::CONTENT));
    assert_eq!(resp.format, Some(ContentFormat::Text));
    assert_eq!(resp.payload, b"hello");
  }

  #[test]
  fn get_int_is_tlv() {
    let resp = get(&mut engine_with(value_object()), "42/0/2");
    assert_eq!(resp.format, Some(ContentFormat::Tlv));

    let (record, _) = tlv::read(&resp.payload).unwrap();
    assert_eq!(record.id, 2);
    assert_eq!(tlv::get_int32(&record), 1234);
  }

  #[test]
  fn get_boolean_is_tlv() {
    let resp = get(&mut engine_with(value_object()), "42/0/3");
    let (record, _) = tlv::read(&resp.payload).unwrap();
    assert_eq!(tlv::get_int32(&record), 1);
  }

  #[test]
  fn get_floatfix_roundtrips() {
    let resp = get(&mut engine_with(value_object()), "42/0/4");
    let (record, _) = tlv::read(&resp.payload).unwrap();
    assert_eq!(tlv::get_float32fix(&record, FLOATFIX_BITS), 512);
  }

  #[test]
  fn resolution_indexes_the_used_slot() {
    // instance id 7 lives in slot 1; the context must name that slot
    let seen = Rc::new(RefCell::new(None));
    let ix = Rc::clone(&seen);
    let object =
      Object::new(42, 3).with_instance(3)
                        .with_instance(7)
                        .resource(Resource::callback(1, Callback::read_only(move |ctx, buf| {
                                    *ix.borrow_mut() = ctx.object_instance_index;
                                    crate::plain_text::write_int(buf, 1)
                                  })));

    get(&mut engine_with(object), "42/7/1");
    assert_eq!(*seen.borrow(), Some(1));
  }

  #[test]
  fn missing_things_are_not_found() {
    let mut engine = engine_with(value_object());
    assert_eq!(get(&mut engine, "41/0/1").code, Some(code::NOT_FOUND));
    assert_eq!(get(&mut engine, "42/9/1").code, Some(code::NOT_FOUND));
    assert_eq!(get(&mut engine, "42/0/9").code, Some(code::NOT_FOUND));
    assert_eq!(get(&mut engine, "42/a/1").code, Some(code::NOT_FOUND));
  }

  #[test]
  fn put_on_value_resource_is_not_allowed() {
    let mut engine = engine_with(value_object());
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("42/0/2", b"99"), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::METHOD_NOT_ALLOWED));
    assert_eq!(engine.registry().get(42).unwrap().resource_value(2), Some(&Value::Int(1234)));
  }

  #[test]
  fn depth_2_get_renders_senml_json() {
    let resp = get(&mut engine_with(value_object()), "42/0");
    assert_eq!(resp.code, Some(code::CONTENT));
    assert_eq!(resp.format, Some(ContentFormat::Json));
    assert_eq!(core::str::from_utf8(&resp.payload).unwrap(),
               concat!(r#"{"e":[{"n":"1","vs":"hello"},{"n":"2","v":1234},"#,
                       r#"{"n":"3","v":true},{"n":"4","v":512}]}"#));
  }

  #[test]
  fn depth_2_get_renders_link_format_on_request() {
    let mut engine = engine_with(value_object());
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    let req = ReqMock { format: Some(ContentFormat::LinkFormat),
                        ..ReqMock::get("42/0") };
    engine.handle(&req, &mut resp, &mut buffer, 0);

    assert_eq!(resp.format, Some(ContentFormat::LinkFormat));
    assert_eq!(core::str::from_utf8(&resp.payload).unwrap(),
               "<42/0>,<42/0/1>,<42/0/2>,<42/0/3>,<42/0/4>");
  }

  #[test]
  fn depth_2_non_get_is_not_allowed() {
    let mut engine = engine_with(value_object());
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("42/0", b""), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::METHOD_NOT_ALLOWED));
  }

  #[test]
  fn depth_1_get_is_not_found() {
    // a bare object path names no instance
    assert_eq!(get(&mut engine_with(value_object()), "42").code, Some(code::NOT_FOUND));
  }

  #[test]
  fn depth_1_put_creates_the_default_instance() {
    // with no instance segment the context's instance id stays 0, and a
    // PUT attempts creation under that id
    let mut engine = engine_with(crate::objects::server::object(1));
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("1", b""), &mut resp, &mut buffer, 0);

    assert_eq!(resp.code, Some(code::CREATED));
    let object = engine.registry().get(1).unwrap();
    assert!(object.instances()[0].is_used());
    assert_eq!(object.instances()[0].id(), 0);
  }

  #[test]
  fn delete_answers_deleted_at_any_depth() {
    let mut engine = engine_with(value_object());
    for url in ["42", "42/0", "42/0/1"] {
      let mut resp = RespMock::default();
      let mut buffer = [0u8; 128];
      engine.handle(&ReqMock::delete(url), &mut resp, &mut buffer, 0);
      assert_eq!(resp.code, Some(code::DELETED), "url {}", url);
    }
  }

  #[test]
  fn create_instance_from_tlv_payload() {
    let mut engine = engine_with(crate::objects::server::object(2));

    let mut payload = [0u8; 16];
    let n = tlv::write_int32(0, 86_400, &mut payload);
    let req = ReqMock::post("1/7", &payload[..n], Some(ContentFormat::Tlv));

    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&req, &mut resp, &mut buffer, 0);

    assert_eq!(resp.code, Some(code::CREATED));
    let object = engine.registry().get(1).unwrap();
    assert!(object.instances()[0].is_used());
    assert_eq!(object.instances()[0].id(), 7);
    assert_eq!(object.resource_value(0), Some(&Value::Int(86_400)));
  }

  #[test]
  fn create_with_empty_payload_just_creates() {
    let mut engine = engine_with(crate::objects::server::object(1));
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("1/3", b""), &mut resp, &mut buffer, 0);

    assert_eq!(resp.code, Some(code::CREATED));
    assert!(engine.registry().get(1).unwrap().instances()[0].is_used());
  }

  #[test]
  fn create_skips_unknown_resource_records() {
    let mut engine = engine_with(crate::objects::server::object(1));

    let mut payload = [0u8; 16];
    let n = tlv::write_int32(99, 5, &mut payload);
    let req = ReqMock::post("1/0", &payload[..n], Some(ContentFormat::Tlv));

    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&req, &mut resp, &mut buffer, 0);

    assert_eq!(resp.code, Some(code::CREATED));
    assert_eq!(engine.registry().get(1).unwrap().resource_value(0), Some(&Value::Int(0)));
  }

  #[test]
  fn depth_1_put_reuses_an_existing_default_instance() {
    // instance 0 is present, so the depth-1 create must not mint a
    // duplicate id in the second slot
    let mut engine = engine_with(value_object());
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("42", b""), &mut resp, &mut buffer, 0);

    assert_eq!(resp.code, Some(code::CREATED));
    let used: Vec<u16> = engine.registry()
                               .get(42)
                               .unwrap()
                               .instances()
                               .iter()
                               .filter(|i| i.is_used())
                               .map(|i| i.id())
                               .collect();
    assert_eq!(used, [0]);
  }

  #[test]
  fn create_with_no_free_slot_is_not_acceptable() {
    let mut engine = engine_with(Object::new(9, 1).with_instance(0));
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&ReqMock::put("9/1", b""), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::NOT_ACCEPTABLE));
  }

  #[test]
  fn create_with_malformed_tlv_is_not_acceptable() {
    let mut engine = engine_with(crate::objects::server::object(1));
    // claims a 2-byte id, buffer ends
    let req = ReqMock::post("1/0", &[0b11_1_00_000, 0x16], Some(ContentFormat::Tlv));
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 128];
    engine.handle(&req, &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::NOT_ACCEPTABLE));
    // the instance itself stays created
    assert!(engine.registry().get(1).unwrap().instances()[0].is_used());
  }

  #[test]
  fn serializer_overflow_is_an_internal_error() {
    let mut engine = engine_with(value_object());
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 3]; // the TLV int needs 4
    engine.handle(&ReqMock::get("42/0/2"), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::INTERNAL_SERVER_ERROR));
  }

  #[test]
  fn callback_put_and_exec() {
    let hits = Rc::new(RefCell::new(Vec::new()));

    let on_write = Rc::clone(&hits);
    let on_exec = Rc::clone(&hits);
    let object =
      Object::new(9, 1).with_instance(0)
                       .resource(Resource::callback(1, Callback {
                         read: None,
                         write: Some(Box::new(move |ctx, payload, _| {
                                       match ctx.reader.read_int(payload) {
                                         | Some((v, used)) => {
                                           on_write.borrow_mut().push(v);
                                           used
                                         },
                                         | None => 0,
                                       }
                                     })),
                         exec: Some(Box::new(move |_, _, _| {
                                      on_exec.borrow_mut().push(-1);
                                      0
                                    })),
                       }));

    let mut engine = engine_with(object);
    let mut buffer = [0u8; 32];

    let mut resp = RespMock::default();
    engine.handle(&ReqMock::put("9/0/1", b"37"), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::CHANGED));

    let mut resp = RespMock::default();
    engine.handle(&ReqMock::post("9/0/1", b"", None), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::CHANGED));

    assert_eq!(*hits.borrow(), vec![37, -1]);
  }

  #[test]
  fn callback_put_with_undecodable_payload_is_not_acceptable() {
    let object = Object::new(9, 1).with_instance(0)
                                  .resource(Resource::callback(1, Callback {
                                    read: None,
                                    write: Some(Box::new(|ctx, payload, _| {
                                                  ctx.reader
                                                     .read_int(payload)
                                                     .map(|(_, used)| used)
                                                     .unwrap_or(0)
                                                })),
                                    exec: None,
                                  }));

    let mut engine = engine_with(object);
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 32];
    engine.handle(&ReqMock::put("9/0/1", b"junk"), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::NOT_ACCEPTABLE));
  }

  #[test]
  fn callback_put_refuses_foreign_formats() {
    let object = Object::new(9, 1).with_instance(0)
                                  .resource(Resource::callback(1, Callback {
                                    read: None,
                                    write: Some(Box::new(|_, _, _| 1)),
                                    exec: None,
                                  }));

    let mut engine = engine_with(object);
    let mut resp = RespMock::default();
    let mut buffer = [0u8; 32];
    let req = ReqMock::put_with_format("9/0/1", b"\x01", Some(ContentFormat::Tlv));
    engine.handle(&req, &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::NOT_ACCEPTABLE));
  }

  #[test]
  fn methods_without_a_callback_are_not_allowed() {
    let object = Object::new(9, 1).with_instance(0)
                                  .resource(Resource::callback(1, Callback::read_only(|_, buf| {
                                              crate::plain_text::write_int(buf, 1)
                                            })));

    let mut engine = engine_with(object);
    let mut buffer = [0u8; 32];

    let mut resp = RespMock::default();
    engine.handle(&ReqMock::put("9/0/1", b"1"), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::METHOD_NOT_ALLOWED));

    let mut resp = RespMock::default();
    engine.handle(&ReqMock::post("9/0/1", b"", None), &mut resp, &mut buffer, 0);
    assert_eq!(resp.code, Some(code::METHOD_NOT_ALLOWED));
  }

  #[test]
  fn registering_hooks_the_path_into_the_transport() {
    let mut engine = engine();
    let mut transport = TransportMock::default();
    engine.register_default_objects(&mut transport).unwrap();
    engine.register(value_object(), &mut transport).unwrap();
    assert_eq!(transport.activated, ["0", "1", "3", "42"]);
  }
}
