// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod bootstrap;
pub mod config;
pub mod logging;

pub use bootstrap::*;
pub use config::*;
pub use logging::*;
