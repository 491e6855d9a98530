/// Whether a user is signed in, as seen by the app shell.
///
/// Loaded from the session store at startup; every change is persisted by the
/// owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    signed_in: bool,
}

impl SessionState {
    pub fn new(signed_in: bool) -> Self {
        Self { signed_in }
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Sets the flag, returning `true` when it changed and needs persisting.
    pub fn set_signed_in(&mut self, signed_in: bool) -> bool {
        let changed = self.signed_in != signed_in;
        self.signed_in = signed_in;
        changed
    }
}
