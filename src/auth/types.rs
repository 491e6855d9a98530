//! Data types for identity-provider sign-in.

use thiserror::Error;

/// User-facing message for any incomplete Apple credential.
pub const CANNOT_PROCESS_MESSAGE: &str = "Cannot process your request";
/// User-facing message for a Google credential without an ID token.
pub const MISSING_GOOGLE_ID_TOKEN_MESSAGE: &str = "Missing Google ID Token";

/// Identity provider a credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Apple,
    Google,
}

/// Raw callback payload from Sign in with Apple.
#[derive(Debug, Clone, Default)]
pub struct AppleCredential {
    /// Identity token as delivered by the provider (UTF-8 JWT bytes).
    pub identity_token: Option<Vec<u8>>,
    /// Unhashed nonce kept from the request.
    pub raw_nonce: Option<String>,
    pub full_name: Option<String>,
}

/// Raw callback payload from Google sign-in.
#[derive(Debug, Clone, Default)]
pub struct GoogleCredential {
    pub id_token: Option<String>,
    pub access_token: String,
}

/// A provider callback result, one variant per provider.
#[derive(Debug, Clone)]
pub enum Credential {
    Apple(AppleCredential),
    Google(GoogleCredential),
}

/// A credential with every required field present, ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCredential {
    Apple {
        id_token: String,
        raw_nonce: String,
        full_name: Option<String>,
    },
    Google {
        id_token: String,
        access_token: String,
    },
}

impl ProviderCredential {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderCredential::Apple { .. } => Provider::Apple,
            ProviderCredential::Google { .. } => Provider::Google,
        }
    }
}

impl Credential {
    pub fn provider(&self) -> Provider {
        match self {
            Credential::Apple(_) => Provider::Apple,
            Credential::Google(_) => Provider::Google,
        }
    }

    /// Checks that the provider delivered everything the backend needs.
    pub fn validate(self) -> Result<ProviderCredential, AuthError> {
        match self {
            Credential::Apple(apple) => {
                let raw_nonce = apple
                    .raw_nonce
                    .ok_or(AuthError::MissingCredentialField("nonce"))?;
                let token = apple
                    .identity_token
                    .ok_or(AuthError::MissingCredentialField("identity token"))?;
                let id_token = String::from_utf8(token)
                    .map_err(|_| AuthError::MissingCredentialField("identity token string"))?;
                Ok(ProviderCredential::Apple {
                    id_token,
                    raw_nonce,
                    full_name: apple.full_name,
                })
            }
            Credential::Google(google) => {
                let id_token = google.id_token.ok_or_else(|| {
                    AuthError::Failure(MISSING_GOOGLE_ID_TOKEN_MESSAGE.to_string())
                })?;
                Ok(ProviderCredential::Google {
                    id_token,
                    access_token: google.access_token,
                })
            }
        }
    }
}

/// The signed-in user as reported by the identity backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub provider: Provider,
}

/// Errors that can occur during sign-in or sign-out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Provider or backend rejected the request; the message is shown verbatim.
    #[error("{0}")]
    Failure(String),

    #[error("Missing credential field: {0}")]
    MissingCredentialField(&'static str),

    #[error("A sign-in request is already in progress")]
    Busy,

    #[error("Auth manager not running")]
    ManagerStopped,

    /// The OS could not supply secure random bytes for the nonce.
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),
}

impl AuthError {
    /// Text for the dismissible alert.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::MissingCredentialField(_) => CANNOT_PROCESS_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Status of the sign-in pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Idle,
    InProgress,
    SignedIn,
    Failed(String),
}

/// Result of one request handled by the auth manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(UserIdentity),
    Failed(AuthError),
    SignedOut,
}
