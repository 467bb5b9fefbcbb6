pub mod manager;

// Re-export from manager.rs so we can do "use crate::session::SessionManager;"
pub use manager::SessionManager;
