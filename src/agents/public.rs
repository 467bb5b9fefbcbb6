use atrium_api::client::AtpServiceClient;
use atrium_xrpc_client::reqwest::ReqwestClient;

/// API agent for public, unauthenticated access.
///
/// A singleton bound to a fixed AppView origin, created once at startup and
/// independent of sign-in state.
pub struct PublicAgent {
    origin: String,
    inner: AtpServiceClient<ReqwestClient>,
}

impl PublicAgent {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            inner: AtpServiceClient::new(ReqwestClient::new(origin)),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The underlying XRPC service client.
    pub fn api(&self) -> &AtpServiceClient<ReqwestClient> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_agent_keeps_origin() {
        let agent = PublicAgent::new("https://public.api.bsky.app");
        assert_eq!(agent.origin(), "https://public.api.bsky.app");
    }
}
