//! Web module for filedrop.
//!
//! This module provides the browser interface: a login page guarding a
//! single file listing with upload, download and delete actions.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;

pub use error::PageError;
pub use router::create_router;
pub use server::WebServer;
