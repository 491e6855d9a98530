use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};

use super::{
    backend::IdentityBackend,
    manager::AuthManager,
    types::{
        AppleCredential, AuthError, AuthOutcome, AuthStatus, CANNOT_PROCESS_MESSAGE, Credential,
        GoogleCredential, MISSING_GOOGLE_ID_TOKEN_MESSAGE, Provider, ProviderCredential,
        UserIdentity,
    },
};

/// Backend that records calls and answers with a canned result.
pub(crate) struct MockBackend {
    pub error: Mutex<Option<AuthError>>,
    pub sign_ins: Mutex<Vec<ProviderCredential>>,
    pub sign_outs: Mutex<usize>,
    /// When set, sign-in and sign-out each wait until notified
    pub gate: Option<Arc<Notify>>,
}

impl MockBackend {
    pub(crate) fn succeeding() -> Self {
        Self {
            error: Mutex::new(None),
            sign_ins: Mutex::new(Vec::new()),
            sign_outs: Mutex::new(0),
            gate: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        let backend = Self::succeeding();
        *backend.error.lock().unwrap() = Some(AuthError::Failure(message.to_string()));
        backend
    }

    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::succeeding()
        }
    }
}

#[async_trait]
impl IdentityBackend for MockBackend {
    async fn sign_in(&self, credential: ProviderCredential) -> Result<UserIdentity, AuthError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let provider = credential.provider();
        self.sign_ins.lock().unwrap().push(credential);
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(UserIdentity {
            uid: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
            email: None,
            provider,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        *self.sign_outs.lock().unwrap() += 1;
        Err(AuthError::Failure("backend offline".to_string()))
    }
}

pub(crate) fn apple_credential(nonce: &str) -> Credential {
    Credential::Apple(AppleCredential {
        identity_token: Some(b"header.payload.signature".to_vec()),
        raw_nonce: Some(nonce.to_string()),
        full_name: None,
    })
}

pub(crate) fn google_credential() -> Credential {
    Credential::Google(GoogleCredential {
        id_token: Some("google-id".to_string()),
        access_token: "google-access".to_string(),
    })
}

pub(crate) async fn wait_for_result(manager: &AuthManager) -> AuthOutcome {
    for _ in 0..100 {
        if let Some(outcome) = manager.try_take_result() {
            return outcome;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("auth manager produced no result");
}

#[test]
fn apple_credential_requires_nonce_and_token() {
    let missing_nonce = Credential::Apple(AppleCredential {
        identity_token: Some(b"token".to_vec()),
        raw_nonce: None,
        full_name: None,
    });
    let err = missing_nonce.validate().unwrap_err();
    assert_eq!(err, AuthError::MissingCredentialField("nonce"));
    assert_eq!(err.user_message(), CANNOT_PROCESS_MESSAGE);

    let missing_token = Credential::Apple(AppleCredential {
        identity_token: None,
        raw_nonce: Some("n".to_string()),
        full_name: None,
    });
    assert_eq!(
        missing_token.validate().unwrap_err().user_message(),
        CANNOT_PROCESS_MESSAGE
    );

    let bad_utf8 = Credential::Apple(AppleCredential {
        identity_token: Some(vec![0xff, 0xfe]),
        raw_nonce: Some("n".to_string()),
        full_name: None,
    });
    assert!(matches!(
        bad_utf8.validate(),
        Err(AuthError::MissingCredentialField(_))
    ));
}

#[test]
fn complete_credentials_validate() {
    let apple = apple_credential("raw-nonce").validate().unwrap();
    assert_eq!(
        apple,
        ProviderCredential::Apple {
            id_token: "header.payload.signature".to_string(),
            raw_nonce: "raw-nonce".to_string(),
            full_name: None,
        }
    );

    let google = google_credential().validate().unwrap();
    assert_eq!(google.provider(), Provider::Google);
}

#[test]
fn google_credential_requires_id_token() {
    let credential = Credential::Google(GoogleCredential {
        id_token: None,
        access_token: "access".to_string(),
    });
    let err = credential.validate().unwrap_err();
    assert_eq!(err.user_message(), MISSING_GOOGLE_ID_TOKEN_MESSAGE);
}

#[test]
fn provider_failures_are_shown_verbatim() {
    let err = AuthError::Failure("The user canceled the sign-in flow.".to_string());
    assert_eq!(err.user_message(), "The user canceled the sign-in flow.");
}

#[tokio::test]
async fn test_auth_manager_creation() {
    let manager = AuthManager::new(
        &tokio::runtime::Handle::current(),
        Arc::new(MockBackend::succeeding()),
    );
    assert_eq!(manager.get_status().await, AuthStatus::Idle);
    assert!(!manager.is_sign_in_pending());
    assert!(manager.try_take_result().is_none());
}

#[tokio::test]
async fn sign_in_success_is_marshalled_back() {
    let backend = Arc::new(MockBackend::succeeding());
    let manager = AuthManager::new(&tokio::runtime::Handle::current(), backend.clone());

    manager.request_sign_in(google_credential()).unwrap();
    let outcome = wait_for_result(&manager).await;

    match outcome {
        AuthOutcome::SignedIn(identity) => {
            assert_eq!(identity.uid, "user-1");
            assert_eq!(identity.provider, Provider::Google);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(manager.get_status().await, AuthStatus::SignedIn);
    assert_eq!(backend.sign_ins.lock().unwrap().len(), 1);
    assert!(manager.try_take_result().is_none());
}

#[tokio::test]
async fn sign_in_failure_is_marshalled_back() {
    let manager = AuthManager::new(
        &tokio::runtime::Handle::current(),
        Arc::new(MockBackend::failing("Invalid credential")),
    );

    manager.request_sign_in(apple_credential("abc")).unwrap();
    let outcome = wait_for_result(&manager).await;

    assert_eq!(
        outcome,
        AuthOutcome::Failed(AuthError::Failure("Invalid credential".to_string()))
    );
    assert_eq!(
        manager.get_status().await,
        AuthStatus::Failed("Invalid credential".to_string())
    );
    assert!(!manager.is_sign_in_pending());
}

#[tokio::test]
async fn incomplete_credential_never_reaches_backend() {
    let backend = Arc::new(MockBackend::succeeding());
    let manager = AuthManager::new(&tokio::runtime::Handle::current(), backend.clone());

    let err = manager
        .request_sign_in(Credential::Apple(AppleCredential::default()))
        .unwrap_err();
    assert!(matches!(err, AuthError::MissingCredentialField(_)));
    assert!(!manager.is_sign_in_pending());

    sleep(Duration::from_millis(20)).await;
    assert!(backend.sign_ins.lock().unwrap().is_empty());
}

#[tokio::test]
async fn second_sign_in_while_pending_is_busy() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(MockBackend::gated(gate.clone()));
    let manager = AuthManager::new(&tokio::runtime::Handle::current(), backend.clone());

    manager.request_sign_in(google_credential()).unwrap();
    assert!(manager.is_sign_in_pending());
    assert_eq!(
        manager.request_sign_in(apple_credential("n")).unwrap_err(),
        AuthError::Busy
    );

    gate.notify_one();
    let outcome = wait_for_result(&manager).await;
    assert!(matches!(outcome, AuthOutcome::SignedIn(_)));
    assert_eq!(backend.sign_ins.lock().unwrap().len(), 1);

    // Guard released once the first request finished
    manager.request_sign_in(google_credential()).unwrap();
    gate.notify_one();
    assert!(matches!(
        wait_for_result(&manager).await,
        AuthOutcome::SignedIn(_)
    ));
}

#[tokio::test]
async fn sign_out_errors_are_swallowed() {
    let backend = Arc::new(MockBackend::succeeding());
    let manager = AuthManager::new(&tokio::runtime::Handle::current(), backend.clone());

    manager.request_sign_out().unwrap();
    assert_eq!(wait_for_result(&manager).await, AuthOutcome::SignedOut);
    assert_eq!(*backend.sign_outs.lock().unwrap(), 1);
    assert_eq!(manager.get_status().await, AuthStatus::Idle);
}

#[test]
fn closed_channel_reports_manager_stopped() {
    let manager = AuthManager::with_closed_channel_for_test();
    assert_eq!(
        manager.request_sign_in(google_credential()).unwrap_err(),
        AuthError::ManagerStopped
    );
    assert!(!manager.is_sign_in_pending());
    assert_eq!(
        manager.request_sign_out().unwrap_err(),
        AuthError::ManagerStopped
    );
}
