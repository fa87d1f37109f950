//! Input source abstraction
//!
//! The core consumes input, it does not poll devices. An [`InputSource`]
//! is drained once per outer loop iteration and exposes a queue of key
//! events, the latest pointer state and a running flag. The scheduler
//! consumes one queued key event per fixed tick so a press is visible to
//! every update system for exactly one tick.
//!
//! [`QuadInput`] adapts macroquad's keyboard/mouse state to this shape.

use std::collections::VecDeque;
use macroquad::prelude as mq;
use crate::math::Point;

/// Keys the simulation reacts to. Anything else arrives as `Other` with
/// the backend's raw key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    Enter,
    Escape,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// One keyboard transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Latest pointer position and button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    pub pos: Point,
    /// Button most recently pressed; None once cleared for the tick.
    pub button: Option<PointerButton>,
}

/// Where key events and the quit signal come from.
pub trait InputSource {
    /// Drain pending device events into the queue. Returns false once the
    /// user asked to quit; the loop polls this exactly once per iteration.
    fn poll(&mut self) -> bool;

    /// The oldest queued key event, if any. Systems read this during a
    /// tick; it stays stable until the scheduler pops it.
    fn first_key(&self) -> Option<KeyEvent>;

    /// Drop the oldest queued key event.
    fn pop_key(&mut self);

    /// Latest pointer state.
    fn mouse(&self) -> MouseState;

    /// Forget the pointer button. Called once per tick by the scheduler.
    fn clear_pointer_button(&mut self);
}

/// Input source backed by macroquad's per-frame keyboard/mouse queries.
#[derive(Default)]
pub struct QuadInput {
    keys: VecDeque<KeyEvent>,
    mouse: MouseState,
}

impl QuadInput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for QuadInput {
    fn poll(&mut self) -> bool {
        for code in mq::get_keys_pressed() {
            self.keys.push_back(KeyEvent {
                key: map_key(code),
                state: KeyState::Pressed,
            });
        }
        for code in mq::get_keys_released() {
            self.keys.push_back(KeyEvent {
                key: map_key(code),
                state: KeyState::Released,
            });
        }

        let (x, y) = mq::mouse_position();
        self.mouse.pos = Point::new(x as i32, y as i32);
        if mq::is_mouse_button_pressed(mq::MouseButton::Left) {
            self.mouse.button = Some(PointerButton::Left);
        } else if mq::is_mouse_button_pressed(mq::MouseButton::Middle) {
            self.mouse.button = Some(PointerButton::Middle);
        } else if mq::is_mouse_button_pressed(mq::MouseButton::Right) {
            self.mouse.button = Some(PointerButton::Right);
        }

        // Escape quits, same as the window close button
        !(mq::is_quit_requested() || mq::is_key_pressed(mq::KeyCode::Escape))
    }

    fn first_key(&self) -> Option<KeyEvent> {
        self.keys.front().copied()
    }

    fn pop_key(&mut self) {
        self.keys.pop_front();
    }

    fn mouse(&self) -> MouseState {
        self.mouse
    }

    fn clear_pointer_button(&mut self) {
        self.mouse.button = None;
    }
}

fn map_key(code: mq::KeyCode) -> Key {
    match code {
        mq::KeyCode::Up => Key::Up,
        mq::KeyCode::Down => Key::Down,
        mq::KeyCode::Left => Key::Left,
        mq::KeyCode::Right => Key::Right,
        mq::KeyCode::W => Key::W,
        mq::KeyCode::A => Key::A,
        mq::KeyCode::S => Key::S,
        mq::KeyCode::D => Key::D,
        mq::KeyCode::Space => Key::Space,
        mq::KeyCode::Enter => Key::Enter,
        mq::KeyCode::Escape => Key::Escape,
        other => Key::Other(other as u16),
    }
}
