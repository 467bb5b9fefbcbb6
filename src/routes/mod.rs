pub mod callback;

// Re-export so the binary can do "use bsky_session::routes::wait_for_callback;"
pub use callback::wait_for_callback;
