pub mod base;
pub mod loopback;
pub mod metadata;

// Re-export from base.rs so we can do "use crate::bootstrap::*;"
pub use base::{create_client_loader, ClientLoader};
