//! Web UI for the blog.
//!
//! Server-rendered HTML pages: post lists, post detail, sharing by email,
//! comments and search.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;
pub mod state;
pub mod views;

pub use error::{ErrorCode, WebError};
pub use router::{create_health_router, create_router};
pub use server::WebServer;
pub use state::AppState;
