//! Simulation systems
//!
//! A system is behavior over entities: it runs once per fixed tick, in the
//! order systems were registered with the scene. Built-in systems:
//! physics integration, collision detection/response, rendering. The
//! render system is not a [`System`]; the loop drives it separately,
//! exactly once per outer iteration.

pub mod collision;
pub mod physics;
pub mod render;

pub use collision::{invert_velocity, CollisionSystem};
pub use physics::PhysicsSystem;
pub use render::RenderSystem;

use crate::entity::Registry;
use crate::event::EventBus;
use crate::input::InputSource;

/// Simulation steps per second. Raise this for a faster game.
pub const TICKS_PER_SECOND: u32 = 50;

/// Length of one fixed tick in milliseconds. The game updates at a steady
/// `TICKS_PER_SECOND` regardless of render rate.
pub const UPDATE_TICK_LENGTH: u32 = 1000 / TICKS_PER_SECOND;

/// Behaviors every update system must have.
pub trait System {
    /// Runs once when the owning scene is initialized.
    fn init(&mut self) {}

    /// Runs once per fixed tick. Systems publish through `bus` and read
    /// the tick's input snapshot from `input`.
    fn update(&mut self, world: &mut Registry, bus: &mut EventBus, input: &dyn InputSource);
}
