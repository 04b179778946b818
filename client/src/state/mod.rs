//! Client state cells.
//!
//! DESIGN
//! ======
//! State here is plain data in [`atom::Atom`] cells. Side effects (storage,
//! DOM, audio) subscribe from `util` and never live in this module.

pub mod atom;
pub mod likes;
pub mod radio;
pub mod theme;
