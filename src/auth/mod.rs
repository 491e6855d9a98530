//! Sign-in with external identity providers.
//!
//! Provider callbacks arrive as [`Credential`] values, are validated into
//! [`ProviderCredential`]s and handed to an [`IdentityBackend`] on a tokio task
//! owned by the [`AuthManager`]. The UI polls the manager for the outcome.

pub mod backend;
pub mod manager;
pub mod nonce;
pub mod types;

pub use backend::IdentityBackend;
pub use manager::AuthManager;
pub use nonce::Nonce;
pub use types::{
    AppleCredential, AuthError, AuthOutcome, AuthStatus, Credential, GoogleCredential, Provider,
    ProviderCredential, UserIdentity,
};

#[cfg(test)]
pub(crate) mod tests;
