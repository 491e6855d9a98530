use async_trait::async_trait;

use super::types::{AuthError, ProviderCredential, UserIdentity};

/// Identity backend that exchanges provider credentials for a user session.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn sign_in(&self, credential: ProviderCredential) -> Result<UserIdentity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
