use serde::Serialize;

/// Per-visitor login state.
///
/// Only the gate can mark a session authenticated; hosts own the value and
/// hand it to the gate by reference on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    authenticated: bool,
    user_email: Option<String>,
    user_name: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub(crate) fn login(&mut self, email: String, name: Option<String>) {
        self.authenticated = true;
        self.user_email = Some(email);
        self.user_name = name.filter(|n| !n.is_empty());
    }

    /// Forget everything about the visitor.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
