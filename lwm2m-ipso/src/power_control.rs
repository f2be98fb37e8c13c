//! IPSO Power Control: on/off state plus on-time accounting for a smart
//! plug (or several).
//!
//! Resource 5850 is the switch; resource 5852 is cumulative seconds spent
//! on, and writing `0` to it resets the counter without touching the
//! switch. The running stretch is folded into the total lazily, whenever
//! the counter is read.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_time::Clock;
use lwm2m::object::{Callback, Object, Resource};
use lwm2m::platform::clock_seconds;
use lwm2m::Context;

/// The IPSO object id for Power Control
pub const POWER_CONTROL_OBJECT_ID: u16 = 3312;

/// On/Off
pub const RESOURCE_ON_OFF: u16 = 5850;

/// On Time, in seconds
pub const RESOURCE_ON_TIME: u16 = 5852;

/// How many plugs a [`PowerControl`] drives by default
pub const POWER_CONTROL_NUMBER: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
struct PowerState {
  last_on_time: u64,
  total_on_time: u64,
  is_on: bool,
}

/// A bank of power-control instances.
///
/// The handle stays with the caller (the thing that owns the relay); the
/// object built by [`object`](PowerControl::object) shares the same state
/// through its callbacks, one instance per plug.
#[allow(missing_debug_implementations)]
pub struct PowerControl<C: Clock<T = u64>> {
  states: Rc<RefCell<Vec<PowerState>>>,
  clock: Rc<C>,
}

impl<C: Clock<T = u64> + 'static> PowerControl<C> {
  /// A single plug.
  pub fn new(clock: Rc<C>) -> Self {
    Self::with_count(clock, POWER_CONTROL_NUMBER)
  }

  /// A bank of `count` plugs, instance ids `0..count`.
  pub fn with_count(clock: Rc<C>, count: usize) -> Self {
    Self { states: Rc::new(RefCell::new(vec![PowerState::default(); count])),
           clock }
  }

  /// Build the LWM2M object to register with the engine.
  pub fn object(&self) -> Object {
    let count = self.states.borrow().len();
    let mut object = Object::new(POWER_CONTROL_OBJECT_ID, count);
    for id in 0..count {
      object = object.with_instance(id as u16);
    }

    let states = Rc::clone(&self.states);
    let read_state = move |ctx: &Context, out: &mut [u8]| match slot(ctx, &states) {
      | Some(ix) => {
        let on = states.borrow()[ix].is_on;
        ctx.writer.write_boolean(ctx, out, on)
      },
      | None => 0,
    };

    let states = Rc::clone(&self.states);
    let clock = Rc::clone(&self.clock);
    let write_state = move |ctx: &Context, payload: &[u8], _: &mut [u8]| {
      let ix = match slot(ctx, &states) {
        | Some(ix) => ix,
        | None => return 0,
      };
      let (on, used) = match ctx.reader.read_boolean(payload) {
        | Some(read) => read,
        | None => {
          log::debug!("power control - ignored illegal write to on/off");
          return 0;
        },
      };

      let now = clock_seconds(&*clock);
      let mut states = states.borrow_mut();
      let state = &mut states[ix];
      if on && !state.is_on {
        state.is_on = true;
        state.last_on_time = now;
      } else if !on && state.is_on {
        state.total_on_time += now - state.last_on_time;
        state.is_on = false;
      }
      used
    };

    let states = Rc::clone(&self.states);
    let clock = Rc::clone(&self.clock);
    let read_on_time = move |ctx: &Context, out: &mut [u8]| {
      let ix = match slot(ctx, &states) {
        | Some(ix) => ix,
        | None => return 0,
      };

      let now = clock_seconds(&*clock);
      let mut states = states.borrow_mut();
      let state = &mut states[ix];
      if state.is_on {
        // fold the running stretch into the total
        state.total_on_time += now - state.last_on_time;
        state.last_on_time = now;
      }
      ctx.writer.write_int(ctx, out, state.total_on_time as i32)
    };

    let states = Rc::clone(&self.states);
    let clock = Rc::clone(&self.clock);
    let write_on_time = move |ctx: &Context, payload: &[u8], _: &mut [u8]| {
      let ix = match slot(ctx, &states) {
        | Some(ix) => ix,
        | None => return 0,
      };
      let (value, used) = match ctx.reader.read_int(payload) {
        | Some(read) => read,
        | None => {
          log::debug!("power control - ignored illegal write to on time");
          return 0;
        },
      };

      if value == 0 {
        log::debug!("power control - reset on time");
        let now = clock_seconds(&*clock);
        let mut states = states.borrow_mut();
        let state = &mut states[ix];
        state.total_on_time = 0;
        if state.is_on {
          state.last_on_time = now;
        }
      }
      used
    };

    object.resource(Resource::callback(RESOURCE_ON_OFF,
                                       Callback::read_write(read_state, write_state)))
          .resource(Resource::callback(RESOURCE_ON_TIME,
                                       Callback::read_write(read_on_time, write_on_time)))
  }

  /// Whether plug `instance` is currently on.
  pub fn is_on(&self, instance: usize) -> bool {
    self.states.borrow().get(instance).map(|s| s.is_on).unwrap_or(false)
  }

  /// Seconds plug `instance` has spent on since the last reset, the
  /// running stretch included.
  pub fn total_on_time(&self, instance: usize) -> u64 {
    let now = clock_seconds(&*self.clock);
    self.states
        .borrow()
        .get(instance)
        .map(|s| s.total_on_time + if s.is_on { now - s.last_on_time } else { 0 })
        .unwrap_or(0)
  }
}

/// The plug addressed by the request, bounds-checked.
fn slot(ctx: &Context, states: &Rc<RefCell<Vec<PowerState>>>) -> Option<usize> {
  ctx.object_instance_index.filter(|&ix| ix < states.borrow().len())
}
