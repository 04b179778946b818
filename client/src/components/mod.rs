//! Markup components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the data-attribute contract that the page behaviors in
//! `util` and `embed` bind to. They hold no state of their own.

pub mod comments;
pub mod like_button;
pub mod radio_player;
pub mod theme_toggle;
