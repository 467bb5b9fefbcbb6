//! Library exports for bsky-session, shared between the binary and tests.

pub mod agents;
pub mod bootstrap;
pub mod config;
pub mod oauth;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod utils;
