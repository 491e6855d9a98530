use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, mpsc};

use crate::auth::{
    backend::IdentityBackend,
    types::{AuthError, AuthOutcome, AuthStatus, Credential, ProviderCredential},
};

#[derive(Debug)]
enum AuthRequest {
    SignIn(ProviderCredential),
    SignOut,
}

/// Shared state for managing async sign-in operations.
///
/// Bridges the async identity backend with the synchronous UI: requests are
/// queued on a channel, a background task drives the backend, and the UI
/// drains results with [`AuthManager::try_take_result`].
#[derive(Clone)]
pub struct AuthManager {
    request_tx: mpsc::UnboundedSender<AuthRequest>,
    status: Arc<Mutex<AuthStatus>>,
    last_result: Arc<Mutex<Option<AuthOutcome>>>,
    /// Set while a sign-in is queued or running
    sign_in_pending: Arc<AtomicBool>,
}

impl AuthManager {
    /// Create a new auth manager.
    ///
    /// This spawns a background task that talks to `backend`.
    ///
    /// # Arguments
    /// * `runtime_handle` - Tokio runtime handle for spawning async tasks
    /// * `backend` - Identity backend handling the requests
    pub fn new(runtime_handle: &tokio::runtime::Handle, backend: Arc<dyn IdentityBackend>) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<AuthRequest>();
        let status = Arc::new(Mutex::new(AuthStatus::Idle));
        let last_result = Arc::new(Mutex::new(None));
        let sign_in_pending = Arc::new(AtomicBool::new(false));

        let status_clone = status.clone();
        let result_clone = last_result.clone();
        let pending_clone = sign_in_pending.clone();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                match request {
                    AuthRequest::SignIn(credential) => {
                        log::debug!("Processing sign-in request for {:?}", credential.provider());
                        *status_clone.lock().await = AuthStatus::InProgress;

                        let outcome = match backend.sign_in(credential).await {
                            Ok(identity) => {
                                log::info!("Signed in as {} via {:?}", identity.uid, identity.provider);
                                *status_clone.lock().await = AuthStatus::SignedIn;
                                AuthOutcome::SignedIn(identity)
                            }
                            Err(e) => {
                                log::error!("Sign-in failed: {}", e);
                                *status_clone.lock().await = AuthStatus::Failed(e.to_string());
                                AuthOutcome::Failed(e)
                            }
                        };
                        pending_clone.store(false, Ordering::SeqCst);
                        *result_clone.lock().await = Some(outcome);
                    }
                    AuthRequest::SignOut => {
                        if let Err(e) = backend.sign_out().await {
                            log::warn!("Identity backend sign-out failed: {}", e);
                        }
                        *status_clone.lock().await = AuthStatus::Idle;
                        *result_clone.lock().await = Some(AuthOutcome::SignedOut);
                    }
                }
            }
            log::debug!("Auth request channel closed");
        });

        Self {
            request_tx,
            status,
            last_result,
            sign_in_pending,
        }
    }

    /// Request a sign-in with a provider callback result.
    ///
    /// Incomplete credentials are rejected before anything is queued. Only one
    /// sign-in may be outstanding; a second request fails with
    /// [`AuthError::Busy`].
    pub fn request_sign_in(&self, credential: Credential) -> Result<(), AuthError> {
        let credential = credential.validate()?;

        if self
            .sign_in_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            log::warn!("Rejecting sign-in while another is in progress");
            return Err(AuthError::Busy);
        }

        self.request_tx
            .send(AuthRequest::SignIn(credential))
            .map_err(|_| {
                self.sign_in_pending.store(false, Ordering::SeqCst);
                AuthError::ManagerStopped
            })
    }

    /// Tell the backend the user signed out. Backend errors are only logged.
    pub fn request_sign_out(&self) -> Result<(), AuthError> {
        self.request_tx
            .send(AuthRequest::SignOut)
            .map_err(|_| AuthError::ManagerStopped)
    }

    pub fn is_sign_in_pending(&self) -> bool {
        self.sign_in_pending.load(Ordering::SeqCst)
    }

    /// Get the current sign-in status.
    pub async fn get_status(&self) -> AuthStatus {
        self.status.lock().await.clone()
    }

    /// Try to get the result without waiting (non-blocking).
    pub fn try_take_result(&self) -> Option<AuthOutcome> {
        self.last_result.try_lock().ok().and_then(|mut r| r.take())
    }
}

#[cfg(test)]
impl AuthManager {
    pub(crate) fn with_closed_channel_for_test() -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<AuthRequest>();
        drop(rx);
        Self {
            request_tx: tx,
            status: Arc::new(Mutex::new(AuthStatus::Idle)),
            last_result: Arc::new(Mutex::new(None)),
            sign_in_pending: Arc::new(AtomicBool::new(false)),
        }
    }
}
