//! Application shell: gates the editor behind sign-in and owns the session flag.

use crate::auth::{
    AppleCredential, AuthError, AuthManager, AuthOutcome, Credential, GoogleCredential, Nonce,
    UserIdentity,
};
use crate::editor::{EditorController, InkLayer};
use crate::session::{SessionState, SessionStore};
use log::{debug, error, info, warn};

/// Top-level screen shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignIn,
    Editor,
}

/// Ties sign-in, session persistence and the editor together.
///
/// All methods run on the UI thread; sign-in results arrive through
/// [`PhotoEditorApp::poll_auth`].
pub struct PhotoEditorApp<I: InkLayer> {
    editor: EditorController<I>,
    auth: AuthManager,
    store: SessionStore,
    session: SessionState,
    user: Option<UserIdentity>,
    /// Raw nonce of the Apple request in flight
    apple_nonce: Option<String>,
    loading: bool,
    alert: Option<String>,
}

impl<I: InkLayer> PhotoEditorApp<I> {
    /// Creates the app, restoring the signed-in flag from `store`.
    ///
    /// An unreadable session file starts the app signed out.
    pub fn new(editor: EditorController<I>, auth: AuthManager, store: SessionStore) -> Self {
        let session = store.load().unwrap_or_else(|err| {
            warn!("Failed to load session state, starting signed out: {:#}", err);
            SessionState::default()
        });
        info!(
            "Starting on {} screen",
            if session.is_signed_in() { "editor" } else { "sign-in" }
        );
        Self {
            editor,
            auth,
            store,
            session,
            user: None,
            apple_nonce: None,
            loading: false,
            alert: None,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_signed_in() {
            Screen::Editor
        } else {
            Screen::SignIn
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn editor(&self) -> &EditorController<I> {
        &self.editor
    }

    /// The editor, only while signed in.
    pub fn editor_mut(&mut self) -> Option<&mut EditorController<I>> {
        match self.screen() {
            Screen::Editor => Some(&mut self.editor),
            Screen::SignIn => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Starts a Sign in with Apple request and returns the hashed nonce to
    /// put in it.
    ///
    /// Fails only when the OS has no secure randomness; the sign-in must not
    /// proceed in that case.
    pub fn begin_apple_sign_in(&mut self) -> Result<String, AuthError> {
        let nonce = Nonce::generate().inspect_err(|err| {
            error!("Cannot start Apple sign-in: {}", err);
        })?;
        let hashed = nonce.hashed().to_string();
        self.apple_nonce = Some(nonce.into_raw());
        Ok(hashed)
    }

    /// Completes the Apple flow with the provider's callback payload.
    pub fn complete_apple_sign_in(&mut self, identity_token: Option<Vec<u8>>, full_name: Option<String>) {
        let credential = Credential::Apple(AppleCredential {
            identity_token,
            raw_nonce: self.apple_nonce.take(),
            full_name,
        });
        self.submit(credential);
    }

    pub fn sign_in_with_google(&mut self, credential: GoogleCredential) {
        self.submit(Credential::Google(credential));
    }

    fn submit(&mut self, credential: Credential) {
        match self.auth.request_sign_in(credential) {
            Ok(()) => {
                self.loading = true;
            }
            Err(AuthError::Busy) => {
                warn!("Sign-in already in progress");
                self.alert = Some(AuthError::Busy.user_message());
            }
            Err(err) => {
                warn!("Sign-in request rejected: {}", err);
                self.fail(err);
            }
        }
    }

    fn fail(&mut self, err: AuthError) {
        self.loading = false;
        self.alert = Some(err.user_message());
    }

    /// Applies a finished sign-in, if any. Returns `true` when state changed.
    pub fn poll_auth(&mut self) -> bool {
        let Some(outcome) = self.auth.try_take_result() else {
            return false;
        };

        match outcome {
            AuthOutcome::SignedIn(identity) if !self.loading => {
                debug!("Ignoring sign-in for {} that finished after sign-out", identity.uid);
            }
            AuthOutcome::SignedIn(identity) => {
                info!("User {} signed in", identity.uid);
                self.loading = false;
                self.user = Some(identity);
                self.update_session(true);
            }
            AuthOutcome::Failed(err) => {
                self.fail(err);
            }
            AuthOutcome::SignedOut => {
                debug!("Identity backend acknowledged sign-out");
            }
        }
        true
    }

    /// Discards the editor document and returns to the sign-in screen.
    pub fn sign_out(&mut self) {
        self.editor.sign_out();
        self.user = None;
        self.apple_nonce = None;
        self.loading = false;
        self.update_session(false);
        if let Err(err) = self.auth.request_sign_out() {
            warn!("Could not notify identity backend of sign-out: {}", err);
        }
    }

    fn update_session(&mut self, signed_in: bool) {
        if !self.session.set_signed_in(signed_in) {
            return;
        }
        if let Err(err) = self.store.save(&self.session) {
            error!("Failed to persist session state: {:#}", err);
        }
    }
}
