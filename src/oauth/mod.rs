pub mod atrium;
pub mod base;

// Re-export the primary OAuth seam so code outside can do
// "use crate::oauth::{OAuthHandle, OAuthSessionHandle};".
pub use base::{CallbackQuery, OAuthHandle, OAuthSessionHandle};
