//! Middleware for the web pages.

pub mod error_page;
pub mod security;

pub use error_page::error_pages;
pub use security::security_headers;
