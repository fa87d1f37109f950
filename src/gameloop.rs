//! The fixed-timestep game loop
//!
//! Classic deWiTTERS-style scheduling: the simulation advances in 20ms
//! ticks pinned to wall time, the renderer runs once per outer iteration
//! and interpolates the leftover sub-tick time. Updating and rendering
//! are decoupled: a slow display never changes simulation results, and a
//! fast one just draws smoother in-between frames.
//!
//! Per iteration: poll input (quit is only honored here, never mid-tick),
//! run every due tick in registration order, render once. A max-catch-up
//! bound keeps a long stall from freezing the loop in a tick-debt spiral;
//! when it trips, the leftover debt is dropped and the tick boundary
//! re-anchors to the present.

use log::debug;
use crate::entity::Registry;
use crate::event::EventBus;
use crate::input::InputSource;
use crate::scene::SceneManager;
use crate::system::UPDATE_TICK_LENGTH;
use crate::time::Clock;
use crate::CoreError;

/// Most ticks allowed to run back-to-back in one loop iteration.
pub const DEFAULT_MAX_CATCHUP: u32 = 5;

/// Loop lifecycle. Terminated is entered when the input source reports a
/// quit, checked once at the top of each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Drives input, fixed-tick updates and rendering over the current scene.
pub struct GameLoop {
    input: Box<dyn InputSource>,
    clock: Box<dyn Clock>,
    pub scenes: SceneManager,
    world: Registry,
    bus: EventBus,
    state: LoopState,
    started: bool,
    now: u32,
    /// Next scheduled simulation boundary.
    next_tick: u32,
    /// Catch-up bound; see [`DEFAULT_MAX_CATCHUP`].
    pub max_catchup: u32,
    fps: u32,
    fps_tick: u32,
}

impl GameLoop {
    pub fn new(input: Box<dyn InputSource>, clock: Box<dyn Clock>) -> Self {
        Self {
            input,
            clock,
            scenes: SceneManager::new(),
            world: Registry::new(),
            bus: EventBus::new(),
            state: LoopState::Running,
            started: false,
            now: 0,
            next_tick: 0,
            max_catchup: DEFAULT_MAX_CATCHUP,
            fps: 0,
            fps_tick: 0,
        }
    }

    /// The registry shared by every system. Spawn your entities here.
    pub fn world_mut(&mut self) -> &mut Registry {
        &mut self.world
    }

    /// The event dispatcher shared by every system. Register handlers
    /// here.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// One outer loop iteration: poll input, run due ticks, render once.
    /// Returns false once the loop is terminated. Callers embedding the
    /// loop in an async frame pump (macroquad) call this between frames;
    /// everyone else uses [`run`](Self::run).
    pub fn step(&mut self) -> Result<bool, CoreError> {
        if self.state == LoopState::Terminated {
            return Ok(false);
        }
        if !self.input.poll() {
            self.state = LoopState::Terminated;
            return Ok(false);
        }

        self.now = self.clock.ticks();
        if !self.started {
            self.started = true;
            self.next_tick = self.now;
            self.fps_tick = self.now;
        }

        let scene = self.scenes.current_mut().ok_or(CoreError::NoScene)?;

        let mut ticks_run = 0;
        let mut capped = false;
        while self.now >= self.next_tick {
            if ticks_run >= self.max_catchup {
                // drop the remaining debt instead of replaying it
                capped = true;
                self.next_tick = self.now + UPDATE_TICK_LENGTH;
                break;
            }
            for system in scene.update_systems_mut() {
                system.update(&mut self.world, &mut self.bus, self.input.as_ref());
            }
            // a queued key press is visible for exactly one tick
            self.input.pop_key();
            self.input.clear_pointer_button();
            self.next_tick += UPDATE_TICK_LENGTH;
            ticks_run += 1;
        }

        let render = scene.render_system_mut().ok_or(CoreError::NoRenderer)?;
        render.set_time(self.now);
        // leftover wall time past the last committed tick boundary; zero
        // after a cap so we never interpolate across skipped time
        let accumulator = if capped || self.next_tick <= self.now {
            0
        } else {
            (self.now + UPDATE_TICK_LENGTH) - self.next_tick
        };
        render.set_accumulator(accumulator);
        render.update(&mut self.world)?;

        self.fps += 1;
        if self.now >= self.fps_tick + 1000 {
            debug!("fps: {}", self.fps);
            self.fps = 0;
            self.fps_tick += 1000;
        }
        Ok(true)
    }

    /// Run until the input source reports a quit or a setup error
    /// surfaces.
    pub fn run(&mut self) -> Result<(), CoreError> {
        while self.step()? {}
        Ok(())
    }
}
