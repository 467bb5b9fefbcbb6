//! Shared application state.
//!
//! The explicitly constructed handle through which the UI layer reaches the
//! session manager. It is passed to whatever builds the presentation layer;
//! there is no global lookup path.

use std::sync::Arc;

use crate::config::ConfigV1;
use crate::session::SessionManager;

/// Application state handed to the embedding UI layer.
///
/// Cheap to clone; all fields are shared references.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Session manager owning OAuth client, session and derived agents.
    pub sessions: Arc<SessionManager>,
}
