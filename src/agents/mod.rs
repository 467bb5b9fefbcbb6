pub mod authenticated;
pub mod public;

// Re-export the agent types so consumers can do "use crate::agents::*;"
pub use authenticated::AuthenticatedAgent;
pub use public::PublicAgent;
