//! Network access to the site's own API.

pub mod api;
