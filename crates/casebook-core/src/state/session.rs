//! Session gate.

/// Authentication state, decided solely by the presence of a stored token.
/// The token itself is never inspected or refreshed; an expired one only
/// surfaces as a failed API call downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    Authenticated,
    #[default]
    Anonymous,
}

impl SessionState {
    /// Initial state from whether a stored token exists.
    pub fn from_token_presence(present: bool) -> Self {
        if present {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    pub fn login(&mut self) {
        *self = Self::Authenticated;
    }

    pub fn logout(&mut self) {
        *self = Self::Anonymous;
    }
}
