//! Platform abstraction layer
//!
//! Translates host events (key codes, pointer moves with timestamps) into
//! per-frame simulation input.

pub mod input;

pub use input::{InputTracker, Key, PointerState};
