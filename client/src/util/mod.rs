//! Page behaviors and helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each behavior goes through `host` capabilities, so the same code binds the
//! live page in the browser and the in-memory page under test.

pub mod dial_math;
pub mod lifecycle;
pub mod like_buttons;
pub mod radio_player;
pub mod storage;
pub mod task;
pub mod theme;
pub mod theme_core;
