//! Domain services behind the HTTP routes.
//!
//! SYSTEM CONTEXT
//! ==============
//! Routes stay thin: they resolve request inputs (slug, identity) and hand
//! them to services, which own the record model and store access.

pub mod likes;
