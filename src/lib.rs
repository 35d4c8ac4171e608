//! Naver login callback handling.
//!
//! The application server finishes the Naver code exchange and redirects the
//! browser to a local callback URL carrying `?access_token=<jwt>`. This crate
//! hosts that callback: it parses the query string, persists the token, and
//! sends the browser back into the application.

pub mod callback;
pub mod config;
pub mod params;
pub mod server;
pub mod store;
