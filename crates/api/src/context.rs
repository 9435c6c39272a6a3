/// Verified caller identity for a request.
///
/// Inserted into request extensions by the auth gateway after token
/// verification; present on every resource route that reached its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    identity: String,
}

impl ActorContext {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}
