//! Page handlers for the web UI.

pub mod blog;

pub use blog::*;
