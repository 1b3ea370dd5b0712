//! Request-time blog server for folio.
//!
//! Regenerates the blog index and post pages on every request, so edits to
//! posts show up on the next reload.

pub mod server;

pub use server::{DevServer, DevServerConfig, ServerError};
