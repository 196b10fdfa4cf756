//! Host input tracking
//!
//! Held keys and the pointer are sampled once per frame. Pause and launch are
//! edge-triggered: each key-down queues one action that the next frame
//! consumes. The pointer counts as moving until `idle_ms` passes without a
//! move event, checked against the frame timestamp.

use std::collections::HashSet;

use crate::consts::POINTER_IDLE_MS;
use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Pause,
    Launch,
}

impl Key {
    /// Map a DOM-style key identifier
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "p" | "P" | "Escape" => Some(Key::Pause),
            " " | "Space" => Some(Key::Launch),
            _ => None,
        }
    }
}

/// Last known pointer position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    /// Timestamp of the last move event
    pub last_move_ms: Option<f64>,
}

impl PointerState {
    /// Moved within the last `idle_ms` as of `now_ms`
    pub fn is_moving(&self, now_ms: f64, idle_ms: f64) -> bool {
        self.last_move_ms
            .is_some_and(|t| now_ms - t < idle_ms)
    }
}

#[derive(Debug, Clone)]
pub struct InputTracker {
    held: HashSet<Key>,
    pointer: PointerState,
    pending_pause: bool,
    pending_launch: bool,
    idle_ms: f64,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(POINTER_IDLE_MS)
    }
}

impl InputTracker {
    pub fn new(idle_ms: f64) -> Self {
        Self {
            held: HashSet::new(),
            pointer: PointerState::default(),
            pending_pause: false,
            pending_launch: false,
            idle_ms,
        }
    }

    /// Record a key press; returns false for keys the game ignores
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };
        match key {
            Key::Left | Key::Right => {
                self.held.insert(key);
            }
            Key::Pause => self.pending_pause = true,
            Key::Launch => self.pending_launch = true,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.held.remove(&key);
        }
    }

    /// Record a pointer move in playfield coordinates
    pub fn pointer_move(&mut self, x: f32, y: f32, now_ms: f64) {
        self.pointer = PointerState {
            x,
            y,
            last_move_ms: Some(now_ms),
        };
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Drop everything held, e.g. when the host window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pending_pause = false;
        self.pending_launch = false;
    }

    /// Build this frame's input and consume queued one-shot actions
    pub fn take_tick_input(&mut self, now_ms: f64) -> TickInput {
        let pointer_x = self
            .pointer
            .is_moving(now_ms, self.idle_ms)
            .then_some(self.pointer.x);

        let input = TickInput {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            pointer_x,
            launch: self.pending_launch,
            pause: self.pending_pause,
            idle_mode: false,
        };
        self.pending_launch = false;
        self.pending_pause = false;
        input
    }
}
